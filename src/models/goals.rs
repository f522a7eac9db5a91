use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Which calorie target the user committed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMode {
    Maintenance,
    Deficit,
    Surplus,
}

impl GoalMode {
    pub const ALL: [GoalMode; 3] = [GoalMode::Deficit, GoalMode::Maintenance, GoalMode::Surplus];
}

impl FromStr for GoalMode {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "maintenance" | "maintain" => Ok(GoalMode::Maintenance),
            "deficit" | "cut" => Ok(GoalMode::Deficit),
            "surplus" | "bulk" => Ok(GoalMode::Surplus),
            other => Err(TrackerError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for GoalMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GoalMode::Maintenance => "maintenance",
            GoalMode::Deficit => "deficit",
            GoalMode::Surplus => "surplus",
        };
        write!(f, "{}", name)
    }
}

/// Derived daily targets.
///
/// `calories` is 0 until a mode has been selected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goals {
    pub maintenance: u32,
    pub deficit: u32,
    pub surplus: u32,
    #[serde(default)]
    pub calories: u32,
    pub protein: u32,
    #[serde(default)]
    pub selected: Option<GoalMode>,
    /// Set by the calculator, so targets that clamp to 0 still count.
    #[serde(default)]
    pub calculated: bool,
}

impl Goals {
    /// Target for a given mode.
    pub fn calories_for(&self, mode: GoalMode) -> u32 {
        match mode {
            GoalMode::Maintenance => self.maintenance,
            GoalMode::Deficit => self.deficit,
            GoalMode::Surplus => self.surplus,
        }
    }

    /// Whether the calculator has produced these goals.
    ///
    /// Snapshots written before the flag existed count when they carry a
    /// maintenance figure.
    pub fn is_calculated(&self) -> bool {
        self.calculated || self.maintenance > 0
    }

    /// Whether a calorie mode has been chosen.
    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }
}
