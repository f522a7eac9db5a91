pub mod analyzer;
pub mod capture;
pub mod cli;
pub mod config;
pub mod error;
pub mod goals;
pub mod interface;
pub mod models;
pub mod state;
pub mod tracker;

pub use error::{Result, TrackerError};
pub use models::{DailyLedger, DayKey, GoalMode, Goals, Intake, Profile, SavedFood};
