//! Ports Layer - Hexagonal Architecture Boundaries
//!
//! Defines the interfaces (traits) that the counter service requires
//! from the outside world. Adapters implement these traits.
//!
//! Port categories:
//! - `CounterRepository`: Snapshot persistence
//! - `Clock`: Calendar date used to key daily counters

pub mod clock;
pub mod repository;
