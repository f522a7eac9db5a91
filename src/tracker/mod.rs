pub mod estimator;
pub mod ledger;

pub use estimator::EstimatorSelection;
pub use ledger::{add_intake, check_rollover, progress, reset_day, undo_last, Progress};
