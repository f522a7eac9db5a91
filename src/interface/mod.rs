pub mod prompts;
pub mod render;

pub use prompts::{
    prompt_food_choice, prompt_goal_mode, prompt_profile, prompt_yes_no, run_estimator,
};
pub use render::{
    display_added, display_estimator, display_food_list, display_goals, display_status,
    progress_bar,
};
