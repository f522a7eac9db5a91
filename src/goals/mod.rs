pub mod calculations;
pub mod constants;

pub use calculations::{basal_metabolic_rate, compute, select_goal, select_goal_by_name, validate_profile};
pub use constants::*;
