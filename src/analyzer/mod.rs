//! Photo-based intake estimation through a remote vision model.
//!
//! The analyzer is the only asynchronous piece of the tracker. Callers race it
//! against a [`CancellationToken`]; a result that arrives after cancellation
//! is dropped and never reaches the ledger.

pub mod anthropic;
pub mod reply;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::capture::CapturedImage;
use crate::error::{Result, TrackerError};
use crate::models::Intake;

pub use anthropic::AnthropicAnalyzer;
pub use reply::{parse_reply, strip_code_fences};

/// Instruction sent alongside every image.
pub const ANALYSIS_PROMPT: &str = "Analyze this food image and estimate the total calories and protein in grams. Respond ONLY with a JSON object in this exact format with no other text: {\"calories\": number, \"protein\": number, \"foodName\": \"brief description\"}";

/// What the model estimated for one photo.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOutcome {
    pub calories: f64,
    pub protein: f64,
    pub food_name: String,
}

impl AnalysisOutcome {
    /// The ledger event for this estimate.
    ///
    /// An estimate of nothing at all is refused, the same as a manual entry.
    pub fn intake(&self) -> Result<Intake> {
        let intake = Intake::from_amounts(self.calories, self.protein)?;
        if intake.is_empty() {
            return Err(TrackerError::analysis(format!(
                "no calories or protein found in '{}'",
                self.food_name
            )));
        }
        Ok(intake)
    }
}

/// A remote service that estimates nutrition from a food photo.
#[async_trait]
pub trait FoodAnalyzer: Send + Sync {
    async fn analyze(&self, image: &CapturedImage) -> Result<AnalysisOutcome>;
}

/// Run one analysis unless `cancel` fires first.
///
/// Returns `Ok(None)` when cancelled; the in-flight request is dropped.
pub async fn analyze_cancellable<A>(
    analyzer: &A,
    image: &CapturedImage,
    cancel: &CancellationToken,
) -> Result<Option<AnalysisOutcome>>
where
    A: FoodAnalyzer + ?Sized,
{
    debug!(bytes = image.len(), "starting food analysis");

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!("food analysis cancelled, any late result will be discarded");
            Ok(None)
        }
        outcome = analyzer.analyze(image) => {
            // A cancel that lands while the result is being handed back still wins.
            if cancel.is_cancelled() {
                warn!("food analysis finished after cancellation, result discarded");
                return Ok(None);
            }
            outcome.map(Some)
        }
    }
}
