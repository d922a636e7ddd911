//! Domain layer - Pens, counters and their errors.
//!
//! Pure logic with no I/O (hexagonal architecture inner ring).
//! Everything here is testable in isolation with an explicit date.

pub mod counters;
pub mod error;
pub mod pen;

// Re-export core types for convenience
pub use counters::{Adjustment, CounterState, Limits, PenStats, StatsReport};
pub use error::{CounterError, CounterField};
pub use pen::{DAILY_LIMIT, Pen, TOTAL_LIMIT};
