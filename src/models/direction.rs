use serde::{Deserialize, Serialize};

/// Normalized direction of a punch, as stored in the checkin ledger.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    In,
    Out,
}

impl Direction {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Direction::In => "IN",
            Direction::Out => "OUT",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "IN" => Some(Direction::In),
            "OUT" => Some(Direction::Out),
            _ => None,
        }
    }
}

/// Per-device punch direction policy.
///
/// `Auto` derives the direction from the device punch code, the fixed
/// variants force every punch of the device to one direction.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum DirectionPolicy {
    In,
    Out,
    #[default]
    Auto,
}

impl DirectionPolicy {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            DirectionPolicy::In => "IN",
            DirectionPolicy::Out => "OUT",
            DirectionPolicy::Auto => "AUTO",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "IN" => Some(DirectionPolicy::In),
            "OUT" => Some(DirectionPolicy::Out),
            "AUTO" => Some(DirectionPolicy::Auto),
            _ => None,
        }
    }

    /// Helper: convert input code from CLI (lowercase or uppercase)
    pub fn from_code(code: &str) -> Option<Self> {
        DirectionPolicy::from_db_str(&code.trim().to_uppercase())
    }
}
