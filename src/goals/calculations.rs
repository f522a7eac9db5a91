use crate::error::{Result, TrackerError};
use crate::goals::constants::*;
use crate::models::{Gender, GoalMode, Goals, Profile};

/// Basal metabolic rate (kcal/day) via Mifflin-St Jeor.
///
/// `10*weight + 6.25*height - 5*age + s`, where `s` is +5 for men and -161 for women.
pub fn basal_metabolic_rate(gender: Gender, age: u32, weight: f64, height: f64) -> f64 {
    let offset = match gender {
        Gender::Male => BMR_MALE_OFFSET,
        Gender::Female => BMR_FEMALE_OFFSET,
    };
    BMR_WEIGHT_COEFF * weight + BMR_HEIGHT_COEFF * height - BMR_AGE_COEFF * age as f64 + offset
}

/// Round half away from zero into a non-negative integer.
fn round_target(value: f64) -> u32 {
    let rounded = value.round();
    if rounded <= 0.0 {
        0
    } else if rounded >= u32::MAX as f64 {
        u32::MAX
    } else {
        rounded as u32
    }
}

/// Check that the profile has everything the formula needs.
pub fn validate_profile(profile: &Profile) -> Result<Gender> {
    let gender = profile
        .gender
        .ok_or_else(|| TrackerError::validation("please choose a gender"))?;

    if profile.age == 0 {
        return Err(TrackerError::validation("age must be greater than zero"));
    }
    if !profile.weight.is_finite() || profile.weight <= 0.0 {
        return Err(TrackerError::validation("weight must be a positive number"));
    }
    if !profile.height.is_finite() || profile.height <= 0.0 {
        return Err(TrackerError::validation("height must be a positive number"));
    }
    if !is_known_activity_level(profile.activity_level) {
        return Err(TrackerError::validation(format!(
            "unsupported activity level {}",
            profile.activity_level
        )));
    }

    Ok(gender)
}

/// Derive maintenance, deficit, surplus and protein targets.
///
/// Every target is rounded on its own from the unrounded input it depends on,
/// except deficit and surplus which scale the rounded maintenance figure.
/// The result has no calorie mode selected.
pub fn compute(profile: &Profile) -> Result<Goals> {
    let gender = validate_profile(profile)?;

    let bmr = basal_metabolic_rate(gender, profile.age, profile.weight, profile.height);
    let maintenance = round_target(bmr * profile.activity_level);
    let deficit = round_target(maintenance as f64 * DEFICIT_FACTOR);
    let surplus = round_target(maintenance as f64 * SURPLUS_FACTOR);
    let protein = round_target(profile.weight * PROTEIN_PER_KG);

    Ok(Goals {
        maintenance,
        deficit,
        surplus,
        calories: 0,
        protein,
        selected: None,
        calculated: true,
    })
}

/// Commit to one of the three calorie targets.
pub fn select_goal(goals: &Goals, mode: GoalMode) -> Result<Goals> {
    if !goals.is_calculated() {
        return Err(TrackerError::validation(
            "calculate goals from your profile before choosing one",
        ));
    }

    Ok(Goals {
        calories: goals.calories_for(mode),
        selected: Some(mode),
        ..goals.clone()
    })
}

/// Like [`select_goal`] but takes the mode by name.
pub fn select_goal_by_name(goals: &Goals, mode: &str) -> Result<Goals> {
    let mode: GoalMode = mode.parse()?;
    select_goal(goals, mode)
}
