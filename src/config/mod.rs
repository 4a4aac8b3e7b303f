// src/config/mod.rs
// Configuration for family-chat.
// Resolution order: CLI args > env vars (handled by clap) > ~/.family-chat/config.toml > defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::persona::PersonaKey;
use crate::provider::{DEFAULT_API_BASE, DEFAULT_TIMEOUT_SECS};
use crate::resolver::{ModelPolicy, DEFAULT_MODEL_FAMILY, DEFAULT_PREFERRED_MODELS};

/// Contents of ~/.family-chat/config.toml. Every field is optional.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Override for the generativelanguage endpoint
    pub api_base_url: Option<String>,

    /// Model preference order, first match wins
    pub preferred_models: Option<Vec<String>>,

    /// Naming convention for fallback model names
    pub model_family: Option<String>,

    /// Query the service for available models
    pub discover_models: Option<bool>,

    /// Candidates used when discovery is off or unavailable
    pub static_models: Option<Vec<String>>,

    /// Persona selected at start
    pub persona: Option<String>,

    pub request_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Load ~/.family-chat/config.toml; a missing file is an empty config
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

/// Values supplied on the command line (or via env through clap)
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub gemini_api_key: Option<String>,
    pub api_base_url: Option<String>,
    pub persona: Option<String>,
    pub no_discovery: bool,
}

/// Fully resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub api_base_url: String,
    pub policy: ModelPolicy,
    pub discover_models: bool,
    pub static_models: Vec<String>,
    pub persona: PersonaKey,
    pub request_timeout: Duration,
}

impl Settings {
    /// Merge CLI overrides over the file config. A missing API key is fatal.
    pub fn resolve(overrides: Overrides, file: FileConfig) -> Result<Self, ConfigError> {
        let api_key = overrides
            .gemini_api_key
            .or(file.gemini_api_key)
            .or_else(|| std::env::var("MY_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let preferred = file.preferred_models.unwrap_or_else(|| {
            DEFAULT_PREFERRED_MODELS.iter().map(|s| s.to_string()).collect()
        });
        let static_models = file.static_models.unwrap_or_else(|| preferred.clone());

        let persona = match overrides.persona.or(file.persona) {
            Some(label) => label.parse::<PersonaKey>()?,
            None => PersonaKey::Father,
        };

        Ok(Self {
            api_key,
            api_base_url: overrides
                .api_base_url
                .or(file.api_base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            policy: ModelPolicy {
                preferred,
                family: file
                    .model_family
                    .unwrap_or_else(|| DEFAULT_MODEL_FAMILY.to_string()),
            },
            discover_models: !overrides.no_discovery && file.discover_models.unwrap_or(true),
            static_models,
            persona,
            request_timeout: Duration::from_secs(
                file.request_timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

/// Directory holding config, .env and REPL history
pub fn config_dir() -> PathBuf {
    dirs::home_dir().unwrap_or_default().join(".family-chat")
}

/// Get the config file path
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn with_key() -> Overrides {
        Overrides {
            gemini_api_key: Some("test-key".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_config_path() {
        let path = config_path();
        assert!(path.to_string_lossy().contains(".family-chat"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(with_key(), FileConfig::default()).unwrap();
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE);
        assert_eq!(settings.policy, ModelPolicy::default());
        assert_eq!(settings.static_models, settings.policy.preferred);
        assert!(settings.discover_models);
        assert_eq!(settings.persona, PersonaKey::Father);
        assert_eq!(settings.request_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_missing_key_is_fatal() {
        if std::env::var("MY_API_KEY").is_ok() {
            return;
        }
        let blank = Overrides {
            gemini_api_key: Some("  ".into()),
            ..Default::default()
        };
        assert!(matches!(
            Settings::resolve(blank, FileConfig::default()),
            Err(ConfigError::MissingApiKey)
        ));
    }

    #[test]
    fn test_overrides_beat_file() {
        let file = FileConfig {
            gemini_api_key: Some("file-key".into()),
            persona: Some("mother".into()),
            discover_models: Some(true),
            ..Default::default()
        };
        let overrides = Overrides {
            gemini_api_key: Some("cli-key".into()),
            persona: Some("막내 (손준호)".into()),
            no_discovery: true,
            ..Default::default()
        };
        let settings = Settings::resolve(overrides, file).unwrap();
        assert_eq!(settings.api_key, "cli-key");
        assert_eq!(settings.persona, PersonaKey::Sibling);
        assert!(!settings.discover_models);
    }

    #[test]
    fn test_unknown_persona_is_rejected() {
        let overrides = Overrides {
            persona: Some("uncle".into()),
            ..with_key()
        };
        match Settings::resolve(overrides, FileConfig::default()) {
            Err(ConfigError::InvalidPersona(e)) => assert_eq!(e.0, "uncle"),
            other => panic!("expected InvalidPersona, got {:?}", other.map(|s| s.persona)),
        }

        let file = FileConfig {
            persona: Some("삼촌".into()),
            ..Default::default()
        };
        assert!(matches!(
            Settings::resolve(with_key(), file),
            Err(ConfigError::InvalidPersona(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
gemini_api_key = "abc"
preferred_models = ["models/gemini-1.5-pro"]
model_family = "gemini-1.5"
discover_models = false
persona = "어머니"
"#
        )
        .unwrap();

        let config = FileConfig::load_from(file.path()).unwrap();
        let settings = Settings::resolve(Overrides::default(), config).unwrap();
        assert_eq!(settings.api_key, "abc");
        assert_eq!(settings.policy.preferred, vec!["models/gemini-1.5-pro"]);
        assert_eq!(settings.policy.family, "gemini-1.5");
        assert_eq!(settings.static_models, vec!["models/gemini-1.5-pro"]);
        assert!(!settings.discover_models);
        assert_eq!(settings.persona, PersonaKey::Mother);
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let config = FileConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_bad_toml_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "persona = [").unwrap();
        assert!(matches!(
            FileConfig::load_from(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
