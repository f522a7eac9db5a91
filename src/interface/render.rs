use crate::goals::constants::activity_label;
use crate::models::food::format_amount;
use crate::models::{DailyLedger, Goals, Intake, Profile, SavedFood};
use crate::tracker::{EstimatorSelection, Progress};

/// Width of the text progress bars.
const BAR_WIDTH: usize = 24;

/// `[#########.......]` for a 0-100 percentage.
pub fn progress_bar(pct: f64) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

/// Display the three calorie targets and protein target.
pub fn display_goals(profile: &Profile, goals: &Goals) {
    if !goals.is_calculated() {
        println!("No goals yet. Run 'profile' to calculate them.");
        return;
    }

    println!();
    println!("=== Your Goals ===");
    if let Some(gender) = profile.gender {
        println!(
            "Profile: {}, {} y, {} kg, {} cm, {} activity",
            gender,
            profile.age,
            format_amount(profile.weight),
            format_amount(profile.height),
            activity_label(profile.activity_level)
        );
    }
    println!();
    println!("  Deficit      {:>5} cal", goals.deficit);
    println!("  Maintenance  {:>5} cal", goals.maintenance);
    println!("  Surplus      {:>5} cal", goals.surplus);
    println!("  Protein      {:>5} g", goals.protein);
    if let Some(mode) = goals.selected {
        println!();
        println!("Selected: {} ({} cal)", mode, goals.calories);
    }
    println!();
}

/// Display today's totals against the active targets.
pub fn display_status(ledger: &DailyLedger, goals: &Goals, progress: &Progress) {
    println!();
    println!("=== {} ===", ledger.date);
    println!();

    if goals.has_selection() {
        println!(
            "Calories {} {:>5} / {} ({:.0}%)",
            progress_bar(progress.calories_pct),
            ledger.calories,
            goals.calories,
            progress.calories_pct
        );
    } else {
        println!("Calories {:>5} (no goal selected)", ledger.calories);
    }
    println!(
        "Protein  {} {:>5} / {} g ({:.0}%)",
        progress_bar(progress.protein_pct),
        ledger.protein,
        goals.protein,
        progress.protein_pct
    );
    println!();

    if goals.has_selection() {
        if progress.calories_remaining >= 0 {
            println!("{} cal remaining", progress.calories_remaining);
        } else {
            println!("{} cal over target", -progress.calories_remaining);
        }
    }
    println!(
        "{} entr{} today{}",
        ledger.entries(),
        if ledger.entries() == 1 { "y" } else { "ies" },
        if ledger.can_undo() { " (undo available)" } else { "" }
    );
    println!();
}

/// Confirmation line after logging intake.
pub fn display_added(label: &str, intake: &Intake) {
    println!(
        "Added: {} - {} cal, {}g protein",
        label, intake.calories, intake.protein
    );
}

/// Display a list of saved foods.
pub fn display_food_list(foods: &[SavedFood]) {
    if foods.is_empty() {
        println!("No saved foods yet. Add some with 'food add'.");
        return;
    }

    println!();
    println!("=== Saved Foods ({} items) ===", foods.len());
    println!();

    for food in foods {
        println!("  [{}] {}", food.id, food.summary());
    }

    println!();
}

/// Display the current estimator selection and its totals.
pub fn display_estimator(selection: &EstimatorSelection) {
    println!();
    if selection.is_empty() {
        println!("Select foods from your saved items.");
        return;
    }

    for (i, item) in selection.items().iter().enumerate() {
        println!("{:>3}. {}", i + 1, item.summary());
    }
    let (calories, protein) = selection.totals();
    println!(
        "Total: {} cal, {}g protein",
        format_amount(calories),
        format_amount(protein)
    );
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar() {
        assert_eq!(progress_bar(0.0), format!("[{}]", ".".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(100.0), format!("[{}]", "#".repeat(BAR_WIDTH)));
        assert_eq!(progress_bar(50.0).matches('#').count(), BAR_WIDTH / 2);
        assert_eq!(progress_bar(250.0), progress_bar(100.0));
    }
}
