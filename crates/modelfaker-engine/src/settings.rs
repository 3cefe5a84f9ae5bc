use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{ConfigurationError, FakerError};

pub const MAX_TRIES_ENV: &str = "MODELFAKER_MAX_TRIES";
pub const SEED_ENV: &str = "MODELFAKER_SEED";

/// Engine tunables, read from the `[faker]` table of a settings file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FakerSettings {
    /// Attempts per record before a uniqueness conflict becomes fatal.
    pub max_tries: u32,
    /// Fixed RNG seed; a fresh OS seed is drawn when unset.
    pub seed: Option<u64>,
}

impl Default for FakerSettings {
    fn default() -> Self {
        Self {
            max_tries: 3,
            seed: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    faker: FakerSettings,
}

impl FakerSettings {
    pub fn from_toml_str(content: &str) -> Result<Self, FakerError> {
        let file: SettingsFile = toml::from_str(content)?;
        file.faker.validate()?;
        Ok(file.faker)
    }

    /// Defaults, then the optional file, then environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, FakerError> {
        let settings = match path {
            Some(path) => Self::from_toml_str(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        let settings = settings.with_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigurationError> {
        if let Some(raw) = lookup(MAX_TRIES_ENV) {
            self.max_tries = parse_env(MAX_TRIES_ENV, &raw)?;
        }
        if let Some(raw) = lookup(SEED_ENV) {
            self.seed = Some(parse_env(SEED_ENV, &raw)?);
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.max_tries == 0 {
            return Err(ConfigurationError::InvalidSetting(
                "max_tries must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &str, raw: &str) -> Result<T, ConfigurationError> {
    raw.trim()
        .parse()
        .map_err(|_| ConfigurationError::InvalidSetting(format!("{key}='{raw}' is not a number")))
}
