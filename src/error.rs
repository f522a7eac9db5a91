use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Unknown goal mode: {0}")]
    InvalidMode(String),

    #[error("Food analysis failed: {0}")]
    Analysis(String),

    #[error("Camera unavailable: {0}")]
    CameraAccess(String),

    #[error("Saved food not found: {0}")]
    FoodNotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Snapshot write failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

impl TrackerError {
    /// Shorthand for a validation failure.
    pub fn validation(msg: impl Into<String>) -> Self {
        TrackerError::Validation(msg.into())
    }

    /// Shorthand for an analyzer failure.
    pub fn analysis(msg: impl Into<String>) -> Self {
        TrackerError::Analysis(msg.into())
    }

    /// Whether the user can recover by correcting input or retrying.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            TrackerError::Validation(_)
                | TrackerError::InvalidMode(_)
                | TrackerError::Analysis(_)
                | TrackerError::FoodNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrackerError>;
