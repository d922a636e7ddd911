//! Use Cases Layer - Application Business Logic
//!
//! Orchestrates the domain counters with the repository and clock
//! ports.
//!
//! Use cases:
//! - `CounterService`: Click, adjust and stats under one lock, with
//!   a snapshot write after every mutation

pub mod counter_service;

pub use counter_service::{CounterService, ServiceError};
