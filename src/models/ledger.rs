use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackerError};

/// Format of a calendar-day key, e.g. `Mon Jan 01 2024`.
pub const DAY_KEY_FORMAT: &str = "%a %b %d %Y";

/// Calendar day the ledger covers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayKey(String);

impl DayKey {
    pub fn from_date(date: NaiveDate) -> Self {
        DayKey(date.format(DAY_KEY_FORMAT).to_string())
    }

    /// Key for the local calendar day right now.
    pub fn today() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for DayKey {
    fn from(value: &str) -> Self {
        DayKey(value.to_string())
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One attributable intake event, also the unit of undo.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intake {
    pub calories: u32,
    pub protein: u32,
}

impl Intake {
    pub fn new(calories: u32, protein: u32) -> Self {
        Self { calories, protein }
    }

    /// Build an intake from real-valued amounts, rounding half away from zero.
    pub fn from_amounts(calories: f64, protein: f64) -> Result<Self> {
        Ok(Self {
            calories: round_amount("calories", calories)?,
            protein: round_amount("protein", protein)?,
        })
    }

    /// Manual quick entry: non-negative, but not both zero.
    pub fn manual(calories: f64, protein: f64) -> Result<Self> {
        let intake = Self::from_amounts(calories, protein)?;
        if intake.is_empty() {
            return Err(TrackerError::validation(
                "enter calories or protein greater than zero",
            ));
        }
        Ok(intake)
    }

    pub fn is_empty(&self) -> bool {
        self.calories == 0 && self.protein == 0
    }
}

fn round_amount(field: &str, value: f64) -> Result<u32> {
    if !value.is_finite() || value < 0.0 {
        return Err(TrackerError::validation(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    let rounded = value.round();
    if rounded > u32::MAX as f64 {
        return Err(TrackerError::validation(format!("{} is too large", field)));
    }
    Ok(rounded as u32)
}

/// Running intake record for one day, with an undo log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLedger {
    pub calories: u32,
    pub protein: u32,
    pub date: DayKey,
    #[serde(default)]
    pub history: Vec<Intake>,
}

impl DailyLedger {
    /// Empty ledger covering `date`.
    pub fn empty(date: DayKey) -> Self {
        Self {
            calories: 0,
            protein: 0,
            date,
            history: Vec::new(),
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.history.is_empty()
    }

    /// Number of intake events recorded today.
    pub fn entries(&self) -> usize {
        self.history.len()
    }

    /// Totals match the sum of the history.
    pub fn is_consistent(&self) -> bool {
        let calories: u64 = self.history.iter().map(|e| e.calories as u64).sum();
        let protein: u64 = self.history.iter().map(|e| e.protein as u64).sum();
        calories == self.calories as u64 && protein == self.protein as u64
    }
}
