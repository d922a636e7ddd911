//! Persistence Adapters - Counter Snapshot Storage
//!
//! Implements the `CounterRepository` port with an atomic JSON file
//! (production) and an in-memory store (persistence disabled).
//! No database dependency.

pub mod memory;
pub mod state;

pub use memory::InMemoryRepository;
pub use state::JsonFileRepository;
