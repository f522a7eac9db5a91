use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use crate::goals::constants::{
    ACTIVITY_ACTIVE, ACTIVITY_LIGHT, ACTIVITY_MODERATE, ACTIVITY_SEDENTARY, ACTIVITY_VERY_ACTIVE,
};

/// NutriTracker: daily calorie and protein tracking against goals derived from your profile.
#[derive(Parser, Debug)]
#[command(name = "nutri_tracker")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Directory holding the tracker's saved state (overrides NUTRI_DATA_DIR).
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Default)]
pub enum Command {
    /// Continue on the screen you last used.
    #[default]
    Resume,

    /// Enter biometrics and calculate calorie/protein goals.
    Profile {
        /// male or female.
        #[arg(long)]
        gender: Option<String>,

        /// Age in years.
        #[arg(long)]
        age: Option<String>,

        /// Weight in kg.
        #[arg(long)]
        weight: Option<String>,

        /// Height in cm.
        #[arg(long)]
        height: Option<String>,

        /// Typical activity level.
        #[arg(long, value_enum)]
        activity: Option<ActivityLevel>,
    },

    /// Choose the calorie target: maintenance, deficit or surplus.
    Goal {
        mode: String,
    },

    /// Show today's intake against your goals.
    Status,

    /// Quickly log calories and protein.
    Add {
        calories: f64,

        /// Grams of protein.
        #[arg(default_value = "0")]
        protein: f64,
    },

    /// Remove the most recent entry from today.
    Undo,

    /// Reset today's intake to zero.
    NewDay {
        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Estimate a meal from a JPEG photo and log it.
    Scan {
        image: PathBuf,
    },

    /// Combine several saved foods into one entry.
    Estimate,

    /// Manage saved foods.
    Food {
        #[command(subcommand)]
        action: FoodCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum FoodCommand {
    /// Save a food for quick logging.
    Add {
        name: String,
        calories: f64,
        /// Grams of protein.
        protein: f64,
    },

    /// List saved foods.
    List,

    /// Delete a saved food by id.
    Delete {
        id: u64,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Log one serving of a saved food (by id or name).
    Eat {
        food: String,
    },

    /// Append foods from a name,calories,protein CSV.
    Import {
        path: PathBuf,
    },

    /// Write saved foods to a name,calories,protein CSV.
    Export {
        path: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub fn factor(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => ACTIVITY_SEDENTARY,
            ActivityLevel::Light => ACTIVITY_LIGHT,
            ActivityLevel::Moderate => ACTIVITY_MODERATE,
            ActivityLevel::Active => ACTIVITY_ACTIVE,
            ActivityLevel::VeryActive => ACTIVITY_VERY_ACTIVE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_resume() {
        let cli = Cli::parse_from(["nutri_tracker"]);
        assert!(matches!(cli.command.unwrap_or_default(), Command::Resume));
    }

    #[test]
    fn test_parse_add_with_default_protein() {
        let cli = Cli::parse_from(["nutri_tracker", "add", "250"]);
        match cli.command {
            Some(Command::Add { calories, protein }) => {
                assert_eq!(calories, 250.0);
                assert_eq!(protein, 0.0);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_profile_flags() {
        let cli = Cli::parse_from([
            "nutri_tracker",
            "--data-dir",
            "/tmp/x",
            "profile",
            "--gender",
            "male",
            "--age",
            "30",
            "--activity",
            "very-active",
        ]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        match cli.command {
            Some(Command::Profile { activity, age, .. }) => {
                assert_eq!(activity, Some(ActivityLevel::VeryActive));
                assert_eq!(age.as_deref(), Some("30"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
