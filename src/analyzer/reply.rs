use serde_json::Value;

use crate::analyzer::AnalysisOutcome;
use crate::error::{Result, TrackerError};

/// Name used when the model leaves `foodName` out.
pub const UNKNOWN_FOOD_NAME: &str = "Unknown food";

/// Remove Markdown code fences the model sometimes wraps its JSON in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parse the model's text reply into an [`AnalysisOutcome`].
///
/// `calories` and `protein` must be present, numeric and non-negative.
pub fn parse_reply(text: &str) -> Result<AnalysisOutcome> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(TrackerError::analysis("empty reply from analyzer"));
    }

    let value: Value = serde_json::from_str(&cleaned)
        .map_err(|e| TrackerError::analysis(format!("reply is not valid JSON: {}", e)))?;

    let calories = numeric_field(&value, "calories")?;
    let protein = numeric_field(&value, "protein")?;
    let food_name = value
        .get("foodName")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(UNKNOWN_FOOD_NAME)
        .to_string();

    Ok(AnalysisOutcome {
        calories,
        protein,
        food_name,
    })
}

fn numeric_field(value: &Value, field: &str) -> Result<f64> {
    let number = value
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| TrackerError::analysis(format!("reply has no numeric '{}'", field)))?;

    if !number.is_finite() || number < 0.0 {
        return Err(TrackerError::analysis(format!(
            "reply has an invalid '{}': {}",
            field, number
        )));
    }
    Ok(number)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_json() {
        let outcome =
            parse_reply(r#"{"calories": 520, "protein": 32.5, "foodName": "Chicken wrap"}"#)
                .unwrap();
        assert_eq!(outcome.calories, 520.0);
        assert_eq!(outcome.protein, 32.5);
        assert_eq!(outcome.food_name, "Chicken wrap");
    }

    #[test]
    fn test_fenced_json() {
        let text = "```json\n{\"calories\": 300, \"protein\": 12, \"foodName\": \"Salad\"}\n```";
        let outcome = parse_reply(text).unwrap();
        assert_eq!(outcome.calories, 300.0);
        assert_eq!(outcome.food_name, "Salad");
    }

    #[test]
    fn test_missing_or_string_fields_fail() {
        assert!(matches!(
            parse_reply(r#"{"calories": 300, "foodName": "Soup"}"#),
            Err(TrackerError::Analysis(_))
        ));
        assert!(matches!(
            parse_reply(r#"{"calories": "lots", "protein": 4}"#),
            Err(TrackerError::Analysis(_))
        ));
        assert!(parse_reply(r#"{"calories": -5, "protein": 4}"#).is_err());
    }

    #[test]
    fn test_zero_protein_is_accepted() {
        let outcome = parse_reply(r#"{"calories": 140, "protein": 0, "foodName": "Cola"}"#).unwrap();
        assert_eq!(outcome.protein, 0.0);
    }

    #[test]
    fn test_missing_name_defaults() {
        let outcome = parse_reply(r#"{"calories": 90, "protein": 1}"#).unwrap();
        assert_eq!(outcome.food_name, UNKNOWN_FOOD_NAME);
    }

    #[test]
    fn test_prose_reply_fails() {
        assert!(parse_reply("I think this is about 400 calories.").is_err());
        assert!(parse_reply("```\n```").is_err());
    }
}
