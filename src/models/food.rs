use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};
use crate::models::Intake;

/// A reusable food template in the saved-foods catalog.
///
/// Created once and never edited; deleting and re-adding is the only way to change it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFood {
    /// Creation timestamp in milliseconds, unique within the catalog.
    pub id: u64,

    pub name: String,

    pub calories: f64,

    /// Grams.
    pub protein: f64,
}

impl SavedFood {
    /// Validate user input and build a saved food.
    ///
    /// Calories must be positive; zero-protein foods are allowed.
    pub fn new(id: u64, name: &str, calories: f64, protein: f64) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(TrackerError::validation("food name is required"));
        }
        if !calories.is_finite() || calories <= 0.0 {
            return Err(TrackerError::validation("calories must be greater than zero"));
        }
        if !protein.is_finite() || protein < 0.0 {
            return Err(TrackerError::validation("protein must not be negative"));
        }

        Ok(Self {
            id,
            name: name.to_string(),
            calories,
            protein,
        })
    }

    /// The ledger event produced by eating one serving.
    pub fn intake(&self) -> Result<Intake> {
        Intake::from_amounts(self.calories, self.protein)
    }

    /// Canonical key for lookups (lowercase name).
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }

    /// One-line summary for listings.
    pub fn summary(&self) -> String {
        format!(
            "{} - {} cal, {}g protein",
            self.name,
            format_amount(self.calories),
            format_amount(self.protein)
        )
    }
}

/// Pick an id for a new food: `now_ms` unless that would collide.
pub fn next_food_id(foods: &[SavedFood], now_ms: u64) -> u64 {
    let max = foods.iter().map(|f| f.id).max().unwrap_or(0);
    if now_ms > max { now_ms } else { max + 1 }
}

/// Render an amount without a trailing `.0` for whole numbers.
pub fn format_amount(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}
