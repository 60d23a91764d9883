//! Tracker configuration
//!
//! Re-exports the shared config type from xpbar-types and adds persistence.

use std::path::Path;

use xpbar_types::TrackerConfig;

use super::ConfigError;

pub const APP_NAME: &str = "xpbar";
pub const CONFIG_NAME: &str = "config";

/// Extension trait for TrackerConfig persistence
pub trait TrackerConfigExt: Sized {
    /// Load the stored config, falling back to defaults when it is missing
    /// or unreadable. Always sanitized.
    fn load() -> Self;
    /// Load an explicit TOML file. Missing fields take their defaults.
    fn load_from(path: &Path) -> Result<Self, ConfigError>;
    fn save(&self) -> Result<(), ConfigError>;
}

impl TrackerConfigExt for TrackerConfig {
    fn load() -> Self {
        match confy::load::<TrackerConfig>(APP_NAME, CONFIG_NAME) {
            Ok(config) => config.sanitized(),
            Err(err) => {
                tracing::warn!(error = %err, "Failed to load tracker config, using defaults");
                TrackerConfig::default()
            }
        }
    }

    fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: TrackerConfig =
            toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(config.sanitized())
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }
}
