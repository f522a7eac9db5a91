use assert_float_eq::assert_float_absolute_eq;

use nutri_tracker_rs::goals::{
    basal_metabolic_rate, compute, select_goal, ACTIVITY_FACTORS, PROTEIN_PER_KG,
};
use nutri_tracker_rs::models::{Gender, GoalMode, Profile, ProfileForm};

fn make_profile(gender: Gender, age: u32, weight: f64, height: f64, activity: f64) -> Profile {
    Profile {
        gender: Some(gender),
        age,
        weight,
        height,
        activity_level: activity,
    }
}

#[test]
fn test_reference_male_profile() {
    let profile = make_profile(Gender::Male, 30, 80.0, 180.0, 1.55);

    assert_float_absolute_eq!(
        basal_metabolic_rate(Gender::Male, 30, 80.0, 180.0),
        1780.0,
        1e-9
    );

    let goals = compute(&profile).unwrap();
    assert_eq!(goals.maintenance, 2759);
    assert_eq!(goals.deficit, 2345);
    assert_eq!(goals.surplus, 3311);
    assert_eq!(goals.protein, 136);
}

#[test]
fn test_targets_are_ordered_for_many_profiles() {
    for gender in [Gender::Male, Gender::Female] {
        for age in [18, 25, 40, 65, 90] {
            for weight in [45.0, 60.5, 80.0, 120.0] {
                for height in [150.0, 172.5, 195.0] {
                    for (activity, _) in ACTIVITY_FACTORS {
                        let profile = make_profile(gender, age, weight, height, activity);
                        let goals = compute(&profile).unwrap();
                        assert!(
                            goals.deficit <= goals.maintenance
                                && goals.maintenance <= goals.surplus,
                            "ordering broken for {:?}: {:?}",
                            profile,
                            goals
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn test_protein_is_rounded_weight_times_factor() {
    for weight in [1.0, 49.9, 62.5, 70.3, 80.0, 99.99, 150.0] {
        let goals = compute(&make_profile(Gender::Female, 35, weight, 165.0, 1.2)).unwrap();
        assert_eq!(goals.protein, (weight * PROTEIN_PER_KG).round() as u32);
    }
}

#[test]
fn test_recalculation_clears_selection() {
    let profile = make_profile(Gender::Female, 28, 62.0, 168.0, 1.375);
    let goals = compute(&profile).unwrap();
    let chosen = select_goal(&goals, GoalMode::Surplus).unwrap();
    assert_eq!(chosen.calories, chosen.surplus);

    let again = compute(&profile).unwrap();
    assert_eq!(again.calories, 0);
    assert!(again.selected.is_none());
}

#[test]
fn test_form_feeds_calculator() {
    let form = ProfileForm {
        gender: Some(Gender::Male),
        age: "30".to_string(),
        weight: " 80 ".to_string(),
        height: "180".to_string(),
        activity_level: Some(1.55),
    };
    let goals = compute(&form.parse().unwrap()).unwrap();
    assert_eq!(goals.maintenance, 2759);
}
