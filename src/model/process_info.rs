use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: i32,
    pub name: String,
    pub cpu_percent: f64,
    pub memory_bytes: u64,
    pub memory_percent: f64,
}

/// Scheduling priority classes offered to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriorityLevel {
    High,
    AboveNormal,
    Normal,
    BelowNormal,
    Idle,
}

impl PriorityLevel {
    /// Unix nice value. Raising priority above normal requires root.
    pub fn nice(self) -> i32 {
        match self {
            PriorityLevel::High => -10,
            PriorityLevel::AboveNormal => -5,
            PriorityLevel::Normal => 0,
            PriorityLevel::BelowNormal => 5,
            PriorityLevel::Idle => 19,
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PriorityLevel::High => "high",
            PriorityLevel::AboveNormal => "above_normal",
            PriorityLevel::Normal => "normal",
            PriorityLevel::BelowNormal => "below_normal",
            PriorityLevel::Idle => "idle",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for PriorityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "high" => Ok(PriorityLevel::High),
            "above_normal" => Ok(PriorityLevel::AboveNormal),
            "normal" => Ok(PriorityLevel::Normal),
            "below_normal" => Ok(PriorityLevel::BelowNormal),
            "idle" => Ok(PriorityLevel::Idle),
            other => Err(format!(
                "Unknown priority '{}' (high, above_normal, normal, below_normal, idle)",
                other
            )),
        }
    }
}
