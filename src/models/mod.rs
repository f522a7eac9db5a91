pub mod food;
pub mod goals;
pub mod ledger;
pub mod profile;
pub mod screen;

pub use food::SavedFood;
pub use goals::{GoalMode, Goals};
pub use ledger::{DailyLedger, DayKey, Intake};
pub use profile::{Gender, Profile, ProfileForm};
pub use screen::Screen;
