use crate::error::CliError;
use mql::renderer::json::JsonMode;
use serde::{Deserialize, Serialize};

/// Defaults for output and logging, optionally loaded from a JSON file.
/// Command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub json_mode: JsonMode,
    pub pretty: bool,
    /// Used when `RUST_LOG` is not set.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            json_mode: JsonMode::Relaxed,
            pretty: true,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    pub fn load(path: Option<&str>) -> Result<Settings, CliError> {
        let Some(path) = path else {
            return Ok(Settings::default());
        };

        let source = std::fs::read_to_string(path)?;
        serde_json::from_str(&source).map_err(|source| CliError::Settings {
            path: path.to_string(),
            source,
        })
    }

    pub fn json_mode(&self, canonical: bool) -> JsonMode {
        if canonical {
            JsonMode::Canonical
        } else {
            self.json_mode
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let settings = Settings::load(None).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.log_level, "info");
        assert!(settings.pretty);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "json_mode": "canonical" }}"#).unwrap();

        let settings = Settings::load(file.path().to_str()).unwrap();
        assert_eq!(settings.json_mode, JsonMode::Canonical);
        assert!(settings.pretty);
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn test_flag_overrides_mode() {
        let settings = Settings::default();
        assert_eq!(settings.json_mode(false), JsonMode::Relaxed);
        assert_eq!(settings.json_mode(true), JsonMode::Canonical);
    }

    #[test]
    fn test_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        let err = Settings::load(file.path().to_str()).unwrap_err();
        assert!(matches!(err, CliError::Settings { .. }));
    }
}
