//! Domain errors for counter operations.
//!
//! Both variants are request-local: they reject a single call and never
//! leave the counters in a partially updated state.

use thiserror::Error;

/// Which adjustable counter a value was supplied for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterField {
    Daily,
    Total,
}

impl CounterField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Total => "total",
        }
    }
}

impl std::fmt::Display for CounterField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum CounterError {
    /// The pen is not part of the fixed catalogue.
    #[error("Unknown pen")]
    UnknownItem(String),

    /// An adjustment value could not be read as an integer.
    #[error("Invalid {field} value")]
    InvalidValue { field: CounterField, value: String },
}
