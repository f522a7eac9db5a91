use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{Result, TrackerError};
use crate::goals::constants::DEFAULT_ACTIVITY_LEVEL;

/// Biological sex used by the BMR formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

impl FromStr for Gender {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            other => Err(TrackerError::validation(format!(
                "gender must be 'male' or 'female', got '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

/// User biometrics. Stored as one snapshot under the `profile` slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Unset until the user picks one; an empty string on disk also means unset.
    #[serde(default, deserialize_with = "gender_or_unset")]
    pub gender: Option<Gender>,

    #[serde(default)]
    pub age: u32,

    /// Kilograms.
    #[serde(default)]
    pub weight: f64,

    /// Centimetres.
    #[serde(default)]
    pub height: f64,

    #[serde(default = "default_activity_level")]
    pub activity_level: f64,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            gender: None,
            age: 0,
            weight: 0.0,
            height: 0.0,
            activity_level: DEFAULT_ACTIVITY_LEVEL,
        }
    }
}

impl Profile {
    /// True once every field the goal formula needs has been filled in.
    pub fn is_complete(&self) -> bool {
        self.gender.is_some() && self.age > 0 && self.weight > 0.0 && self.height > 0.0
    }
}

fn default_activity_level() -> f64 {
    DEFAULT_ACTIVITY_LEVEL
}

fn gender_or_unset<'de, D>(deserializer: D) -> std::result::Result<Option<Gender>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value
            .parse()
            .map(Some)
            .map_err(|e: TrackerError| serde::de::Error::custom(e.to_string())),
    }
}

/// Raw profile fields as typed by the user, before validation.
#[derive(Debug, Clone, Default)]
pub struct ProfileForm {
    pub gender: Option<Gender>,
    pub age: String,
    pub weight: String,
    pub height: String,
    pub activity_level: Option<f64>,
}

impl ProfileForm {
    /// Validate every field and build a [`Profile`].
    ///
    /// Nothing is returned unless all fields are present and positive.
    pub fn parse(&self) -> Result<Profile> {
        let gender = self
            .gender
            .ok_or_else(|| TrackerError::validation("please choose a gender"))?;

        let age: u32 = self
            .age
            .trim()
            .parse()
            .map_err(|_| TrackerError::validation("age must be a whole number of years"))?;
        if age == 0 {
            return Err(TrackerError::validation("age must be greater than zero"));
        }

        let weight = parse_positive("weight", &self.weight)?;
        let height = parse_positive("height", &self.height)?;

        Ok(Profile {
            gender: Some(gender),
            age,
            weight,
            height,
            activity_level: self.activity_level.unwrap_or(DEFAULT_ACTIVITY_LEVEL),
        })
    }
}

fn parse_positive(field: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(TrackerError::validation(format!("{} is required", field)));
    }

    let value: f64 = trimmed
        .parse()
        .map_err(|_| TrackerError::validation(format!("{} must be a number", field)))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(TrackerError::validation(format!(
            "{} must be a positive number",
            field
        )));
    }

    Ok(value)
}
