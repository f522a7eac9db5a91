/// Mifflin-St Jeor weight coefficient (per kg).
pub const BMR_WEIGHT_COEFF: f64 = 10.0;

/// Mifflin-St Jeor height coefficient (per cm).
pub const BMR_HEIGHT_COEFF: f64 = 6.25;

/// Mifflin-St Jeor age coefficient (per year).
pub const BMR_AGE_COEFF: f64 = 5.0;

/// Sex-specific constant added to the male BMR.
pub const BMR_MALE_OFFSET: f64 = 5.0;

/// Sex-specific constant added to the female BMR.
pub const BMR_FEMALE_OFFSET: f64 = -161.0;

/// Deficit target as a fraction of maintenance (15% lower).
pub const DEFICIT_FACTOR: f64 = 0.85;

/// Surplus target as a fraction of maintenance (20% higher).
pub const SURPLUS_FACTOR: f64 = 1.20;

/// Protein target in grams per kg of body weight.
pub const PROTEIN_PER_KG: f64 = 1.7;

// ─────────────────────────────────────────────────────────────────────────────
// Activity multipliers
// ─────────────────────────────────────────────────────────────────────────────

/// Little or no exercise.
pub const ACTIVITY_SEDENTARY: f64 = 1.2;

/// Light exercise 1-3 days a week.
pub const ACTIVITY_LIGHT: f64 = 1.375;

/// Moderate exercise 3-5 days a week.
pub const ACTIVITY_MODERATE: f64 = 1.55;

/// Hard exercise 6-7 days a week.
pub const ACTIVITY_ACTIVE: f64 = 1.725;

/// Physical job or twice-daily training.
pub const ACTIVITY_VERY_ACTIVE: f64 = 1.9;

/// Multiplier used when the profile has never been edited.
pub const DEFAULT_ACTIVITY_LEVEL: f64 = ACTIVITY_MODERATE;

/// Every accepted activity multiplier with its display label.
pub const ACTIVITY_FACTORS: [(f64, &str); 5] = [
    (ACTIVITY_SEDENTARY, "sedentary"),
    (ACTIVITY_LIGHT, "light"),
    (ACTIVITY_MODERATE, "moderate"),
    (ACTIVITY_ACTIVE, "active"),
    (ACTIVITY_VERY_ACTIVE, "very active"),
];

/// Whether `level` is one of the accepted multipliers.
pub fn is_known_activity_level(level: f64) -> bool {
    ACTIVITY_FACTORS
        .iter()
        .any(|(factor, _)| (factor - level).abs() < 1e-9)
}

/// Display label for an activity multiplier.
pub fn activity_label(level: f64) -> &'static str {
    ACTIVITY_FACTORS
        .iter()
        .find(|(factor, _)| (factor - level).abs() < 1e-9)
        .map(|(_, label)| *label)
        .unwrap_or("custom")
}
