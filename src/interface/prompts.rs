use dialoguer::{Confirm, Input, Select};

use crate::error::Result;
use crate::goals::constants::{activity_label, ACTIVITY_FACTORS};
use crate::interface::render::display_estimator;
use crate::models::food::format_amount;
use crate::models::{Gender, GoalMode, Goals, Profile, ProfileForm, SavedFood};
use crate::tracker::EstimatorSelection;

/// Ask for whichever profile fields the form is still missing.
///
/// Previously saved values are offered as defaults.
pub fn prompt_profile(existing: &Profile, mut form: ProfileForm) -> Result<ProfileForm> {
    if form.gender.is_none() {
        let options = ["male", "female"];
        let default = match existing.gender {
            Some(Gender::Female) => 1,
            _ => 0,
        };
        let selection = Select::new()
            .with_prompt("Gender")
            .items(&options[..])
            .default(default)
            .interact()?;
        form.gender = Some(if selection == 0 {
            Gender::Male
        } else {
            Gender::Female
        });
    }

    if form.age.trim().is_empty() {
        form.age = prompt_text("Age (years)", existing.age as f64)?;
    }
    if form.weight.trim().is_empty() {
        form.weight = prompt_text("Weight (kg)", existing.weight)?;
    }
    if form.height.trim().is_empty() {
        form.height = prompt_text("Height (cm)", existing.height)?;
    }

    if form.activity_level.is_none() {
        let options: Vec<String> = ACTIVITY_FACTORS
            .iter()
            .map(|(factor, label)| format!("{} (x{})", label, factor))
            .collect();
        let default = ACTIVITY_FACTORS
            .iter()
            .position(|(_, label)| *label == activity_label(existing.activity_level))
            .unwrap_or(2);
        let selection = Select::new()
            .with_prompt("Activity level")
            .items(&options)
            .default(default)
            .interact()?;
        form.activity_level = Some(ACTIVITY_FACTORS[selection].0);
    }

    Ok(form)
}

fn prompt_text(prompt: &str, previous: f64) -> Result<String> {
    let mut input = Input::<String>::new().with_prompt(prompt);
    if previous > 0.0 {
        input = input.default(format_amount(previous));
    }
    Ok(input.interact_text()?)
}

/// Pick one of the three calorie targets.
pub fn prompt_goal_mode(goals: &Goals) -> Result<GoalMode> {
    let options: Vec<String> = GoalMode::ALL
        .iter()
        .map(|mode| format!("{:<12} {} cal", mode.to_string(), goals.calories_for(*mode)))
        .collect();

    let default = goals
        .selected
        .and_then(|s| GoalMode::ALL.iter().position(|m| *m == s))
        .unwrap_or(1);

    let selection = Select::new()
        .with_prompt("Choose your goal")
        .items(&options)
        .default(default)
        .interact()?;

    Ok(GoalMode::ALL[selection])
}

/// Resolve a fuzzy food-name match with the user.
pub fn prompt_food_choice<'a>(
    query: &str,
    candidates: &[(&'a SavedFood, f64)],
) -> Result<Option<&'a SavedFood>> {
    if candidates.is_empty() {
        println!("No saved food matches '{}'", query);
        return Ok(None);
    }

    if candidates.len() == 1 {
        let food = candidates[0].0;
        let confirm = prompt_yes_no(&format!("Did you mean '{}'?", food.name), true)?;
        return Ok(confirm.then_some(food));
    }

    let options: Vec<&SavedFood> = candidates.iter().take(5).map(|(f, _)| *f).collect();
    let mut labels: Vec<String> = options.iter().map(|f| f.summary()).collect();
    labels.push("None of these".to_string());

    let selection = Select::new()
        .with_prompt("Which did you mean?")
        .items(&labels)
        .default(0)
        .interact()?;

    Ok(options.get(selection).copied())
}

/// Interactive estimator session.
///
/// Returns the selection on confirm, or `None` if the user cancels.
pub fn run_estimator(foods: &[SavedFood]) -> Result<Option<EstimatorSelection>> {
    let mut selection = EstimatorSelection::new();

    loop {
        display_estimator(&selection);

        let mut options: Vec<String> = foods.iter().map(|f| format!("+ {}", f.summary())).collect();
        let remove_idx = options.len();
        options.push("Remove an item".to_string());
        let confirm_idx = options.len();
        options.push("Confirm".to_string());
        let cancel_idx = options.len();
        options.push("Cancel".to_string());

        let choice = Select::new()
            .with_prompt("Add foods to the estimate")
            .items(&options)
            .default(0)
            .interact()?;

        if choice < remove_idx {
            selection.add(&foods[choice]);
        } else if choice == remove_idx {
            if selection.is_empty() {
                println!("Nothing selected yet.");
                continue;
            }
            let labels: Vec<String> = selection.items().iter().map(|f| f.summary()).collect();
            let index = Select::new()
                .with_prompt("Remove which item?")
                .items(&labels)
                .default(0)
                .interact()?;
            selection.remove(index)?;
        } else if choice == confirm_idx {
            if selection.is_empty() {
                println!("Select at least one food first.");
                continue;
            }
            return Ok(Some(selection));
        } else if choice == cancel_idx {
            return Ok(None);
        }
    }
}

/// Prompt for yes/no confirmation.
pub fn prompt_yes_no(prompt: &str, default: bool) -> Result<bool> {
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(default)
        .interact()?)
}
