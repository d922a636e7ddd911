//! Pen catalogue and limits.
//!
//! The set of tracked pens is closed: it is fixed at compile time and
//! cannot be extended at runtime. Limits only drive the "remaining"
//! figures in stats; they are never enforced as a hard cap.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::CounterError;

/// Daily click allowance per pen.
pub const DAILY_LIMIT: u64 = 45;

/// Lifetime click allowance per pen.
pub const TOTAL_LIMIT: u64 = 640;

/// A tracked pen.
///
/// Serialized by its display name (e.g. `"Purple Punch"`), which is also
/// the key used on the wire and in the persisted snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Pen {
    #[serde(rename = "GG5")]
    Gg5,
    #[serde(rename = "Alask Thunder")]
    AlaskThunder,
    #[serde(rename = "Purple Punch")]
    PurplePunch,
    #[serde(rename = "Crystal OG")]
    CrystalOg,
}

impl Pen {
    /// Every pen, in display order.
    pub const ALL: [Self; 4] = [
        Self::Gg5,
        Self::AlaskThunder,
        Self::PurplePunch,
        Self::CrystalOg,
    ];

    /// Display name, identical to the wire key.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Gg5 => "GG5",
            Self::AlaskThunder => "Alask Thunder",
            Self::PurplePunch => "Purple Punch",
            Self::CrystalOg => "Crystal OG",
        }
    }
}

impl fmt::Display for Pen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pen {
    type Err = CounterError;

    /// Exact, case-sensitive match against the display name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|pen| pen.as_str() == s)
            .ok_or_else(|| CounterError::UnknownItem(s.to_string()))
    }
}
