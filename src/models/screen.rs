use serde::{Deserialize, Serialize};

/// Last-active view, used to resume where the user left off.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Screen {
    #[default]
    #[serde(rename = "profileScreen")]
    Profile,
    #[serde(rename = "goalScreen")]
    Goal,
    #[serde(rename = "trackerScreen")]
    Tracker,
}
