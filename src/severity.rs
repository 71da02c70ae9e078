//! Severity classification for comparison findings
//!
//! The ordering is load-bearing: it drives both the descending sort of the
//! final diagnostic list and the broken verdict, so it is defined by an
//! explicit rank rather than declaration order.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// How serious a detected difference is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    None,
    Information,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Numeric rank used for ordering. Higher is more severe.
    pub fn rank(&self) -> u8 {
        match self {
            Severity::None => 0,
            Severity::Information => 1,
            Severity::Warning => 2,
            Severity::Error => 3,
            Severity::Critical => 4,
        }
    }

    /// Whether a finding at this severity breaks the compared API.
    pub fn is_breaking(&self) -> bool {
        matches!(self, Severity::Error | Severity::Critical)
    }

    /// All severities, in ascending rank order.
    pub const ALL: [Severity; 5] = [
        Severity::None,
        Severity::Information,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::None => "None",
            Severity::Information => "Information",
            Severity::Warning => "Warning",
            Severity::Error => "Error",
            Severity::Critical => "Critical",
        }
    }
}

impl PartialOrd for Severity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Severity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "None" => Ok(Severity::None),
            "Information" => Ok(Severity::Information),
            "Warning" => Ok(Severity::Warning),
            "Error" => Ok(Severity::Error),
            "Critical" => Ok(Severity::Critical),
            other => Err(format!("unknown severity '{}'", other)),
        }
    }
}
