//! Runtime configuration loaded from the environment.
//!
//! A `.env` file in the working directory is honoured for local use but
//! skipped under test so tests stay hermetic.

use std::path::PathBuf;
use std::time::Duration;

use crate::error::{Result, TrackerError};

pub const DEFAULT_ANALYZER_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_ANALYZER_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_ANALYZER_TIMEOUT_SECS: u64 = 60;

/// Directory name used under the platform data directory.
const APP_DIR_NAME: &str = "nutri_tracker";

#[derive(Clone, Debug)]
pub struct Config {
    pub data_dir: PathBuf,
    pub anthropic_api_key: Option<String>,
    pub analyzer_model: String,
    pub analyzer_url: String,
    pub analyzer_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = lookup("NUTRI_DATA_DIR")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(default_data_dir);

        let anthropic_api_key = lookup("ANTHROPIC_API_KEY").filter(|v| !v.trim().is_empty());

        let analyzer_model =
            lookup("NUTRI_ANALYZER_MODEL").unwrap_or_else(|| DEFAULT_ANALYZER_MODEL.to_string());
        let analyzer_url =
            lookup("NUTRI_ANALYZER_URL").unwrap_or_else(|| DEFAULT_ANALYZER_URL.to_string());

        let analyzer_timeout = match lookup("NUTRI_ANALYZER_TIMEOUT_SECS") {
            None => Duration::from_secs(DEFAULT_ANALYZER_TIMEOUT_SECS),
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(TrackerError::Config(format!(
                        "NUTRI_ANALYZER_TIMEOUT_SECS must be a positive integer, got '{}'",
                        raw
                    )));
                }
            },
        };

        Ok(Self {
            data_dir,
            anthropic_api_key,
            analyzer_model,
            analyzer_url,
            analyzer_timeout,
        })
    }

    /// Replace the data directory, e.g. from a command-line flag.
    pub fn with_data_dir(mut self, dir: Option<PathBuf>) -> Self {
        if let Some(dir) = dir {
            self.data_dir = dir;
        }
        self
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR_NAME))
        .unwrap_or_else(|| PathBuf::from(format!(".{}", APP_DIR_NAME)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert!(config.anthropic_api_key.is_none());
        assert_eq!(config.analyzer_model, DEFAULT_ANALYZER_MODEL);
        assert_eq!(config.analyzer_url, DEFAULT_ANALYZER_URL);
        assert_eq!(config.analyzer_timeout, Duration::from_secs(60));
        assert!(config.data_dir.ends_with(APP_DIR_NAME) || config.data_dir.ends_with(".nutri_tracker"));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("NUTRI_DATA_DIR", "/tmp/nutri"),
            ("ANTHROPIC_API_KEY", "sk-test"),
            ("NUTRI_ANALYZER_TIMEOUT_SECS", "15"),
        ]))
        .unwrap()
        .with_data_dir(Some(PathBuf::from("/srv/nutri")));

        assert_eq!(config.data_dir, PathBuf::from("/srv/nutri"));
        assert_eq!(config.anthropic_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.analyzer_timeout, Duration::from_secs(15));
    }

    #[test]
    fn test_bad_timeout() {
        let result = Config::from_lookup(lookup(&[("NUTRI_ANALYZER_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(TrackerError::Config(_))));

        let result = Config::from_lookup(lookup(&[("NUTRI_ANALYZER_TIMEOUT_SECS", "0")]));
        assert!(result.is_err());
    }
}
