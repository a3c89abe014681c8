//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::VcdgenConfig;
use std::path::Path;

/// File name looked up in a directory by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "vcdgen.toml";

/// Loads and validates `<dir>/vcdgen.toml`.
pub fn load_config(dir: &Path) -> Result<VcdgenConfig, ConfigError> {
    load_config_file(&dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file at an explicit path.
pub fn load_config_file(path: &Path) -> Result<VcdgenConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Like [`load_config`], but returns the defaults when `<dir>/vcdgen.toml`
/// does not exist. A file that exists but is malformed is still an error.
pub fn load_config_or_default(dir: &Path) -> Result<VcdgenConfig, ConfigError> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        return Ok(VcdgenConfig::default());
    }
    load_config_file(&path)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<VcdgenConfig, ConfigError> {
    let config: VcdgenConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks that the values present are usable.
fn validate_config(config: &VcdgenConfig) -> Result<(), ConfigError> {
    config.header.timescale()?;
    if config.header.version.as_deref() == Some("") {
        return Err(ConfigError::ValidationError {
            field: "header.version".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    if config.output.path.as_deref() == Some("") {
        return Err(ConfigError::ValidationError {
            field: "output.path".to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}
