//! Day-keyed intake ledger transitions.
//!
//! Each function takes the ledger by value and hands back the next one, so a
//! caller either keeps the returned ledger or the old one; there is no
//! half-applied state in between.

use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::models::{DailyLedger, DayKey, Goals, Intake};

/// Start a fresh ledger if `ledger` belongs to another day.
///
/// Calling this twice with the same `today` is the same as calling it once.
pub fn check_rollover(ledger: DailyLedger, today: &DayKey) -> DailyLedger {
    if ledger.date == *today {
        return ledger;
    }

    info!(
        from = %ledger.date,
        to = %today,
        calories = ledger.calories,
        protein = ledger.protein,
        "day changed, starting a new ledger"
    );
    DailyLedger::empty(today.clone())
}

/// Record one intake event.
///
/// Totals may exceed the goals; that is for the display to point out. An
/// intake that would overflow a running total is rejected and the ledger is
/// left as it was.
pub fn add_intake(mut ledger: DailyLedger, intake: Intake, today: &DayKey) -> Result<DailyLedger> {
    let (Some(calories), Some(protein)) = (
        ledger.calories.checked_add(intake.calories),
        ledger.protein.checked_add(intake.protein),
    ) else {
        return Err(TrackerError::validation(
            "that entry would push today's totals past what can be recorded",
        ));
    };

    ledger.calories = calories;
    ledger.protein = protein;
    ledger.history.push(intake);
    ledger.date = today.clone();

    debug!(
        calories = intake.calories,
        protein = intake.protein,
        entries = ledger.history.len(),
        "intake recorded"
    );
    Ok(ledger)
}

/// Reverse the most recent intake, if any.
///
/// Totals are clamped at zero so a corrupted snapshot can never go negative.
/// Returns the removed entry alongside the new ledger.
pub fn undo_last(mut ledger: DailyLedger) -> (DailyLedger, Option<Intake>) {
    let Some(last) = ledger.history.pop() else {
        return (ledger, None);
    };

    ledger.calories = ledger.calories.saturating_sub(last.calories);
    ledger.protein = ledger.protein.saturating_sub(last.protein);

    debug!(
        calories = last.calories,
        protein = last.protein,
        entries = ledger.history.len(),
        "intake undone"
    );
    (ledger, Some(last))
}

/// Discard everything and start over for `today`.
///
/// Destructive; callers must have the user's confirmation first.
pub fn reset_day(ledger: DailyLedger, today: &DayKey) -> DailyLedger {
    info!(
        day = %today,
        discarded_entries = ledger.history.len(),
        discarded_calories = ledger.calories,
        "ledger reset"
    );
    DailyLedger::empty(today.clone())
}

/// Share of the active targets consumed so far.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    /// 0-100, capped.
    pub calories_pct: f64,
    /// 0-100, capped.
    pub protein_pct: f64,
    pub calories_remaining: i64,
    pub protein_remaining: i64,
}

fn capped_pct(value: u32, target: u32) -> f64 {
    if target == 0 {
        return 0.0;
    }
    (value as f64 / target as f64 * 100.0).min(100.0)
}

/// Compare the ledger against the selected calorie target and protein target.
pub fn progress(ledger: &DailyLedger, goals: &Goals) -> Progress {
    Progress {
        calories_pct: capped_pct(ledger.calories, goals.calories),
        protein_pct: capped_pct(ledger.protein, goals.protein),
        calories_remaining: goals.calories as i64 - ledger.calories as i64,
        protein_remaining: goals.protein as i64 - ledger.protein as i64,
    }
}
