//! Configuration types deserialized from `vcdgen.toml`.

use serde::Deserialize;
use vcdgen_core::{HeaderOptions, Timescale};

use crate::error::ConfigError;

/// The top-level configuration parsed from `vcdgen.toml`.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VcdgenConfig {
    /// Fields written in the document header.
    #[serde(default)]
    pub header: HeaderConfig,
    /// Where documents are written when no path is given on the command line.
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[header]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderConfig {
    /// Fixed `$date` text. The current date is used when absent.
    #[serde(default)]
    pub date: Option<String>,
    /// `$version` text. The generator name and version are used when absent.
    #[serde(default)]
    pub version: Option<String>,
    /// Timescale such as `"1ps"` or `"10ns"`. Defaults to `1ps`.
    #[serde(default)]
    pub timescale: Option<String>,
}

impl HeaderConfig {
    /// Parses the timescale, if one is set.
    pub fn timescale(&self) -> Result<Option<Timescale>, ConfigError> {
        self.timescale
            .as_deref()
            .map(|ts| {
                ts.parse::<Timescale>()
                    .map_err(|e| ConfigError::ValidationError {
                        field: "header.timescale".to_string(),
                        reason: e.to_string(),
                    })
            })
            .transpose()
    }

    /// Builds header options, falling back to the defaults for absent fields.
    pub fn to_header_options(&self) -> Result<HeaderOptions, ConfigError> {
        let defaults = HeaderOptions::default();
        Ok(HeaderOptions {
            date: self.date.clone(),
            version: self.version.clone().unwrap_or(defaults.version),
            timescale: self.timescale()?.unwrap_or(defaults.timescale),
        })
    }
}

/// `[output]` table.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Default output file, relative to the working directory.
    #[serde(default)]
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load_config_from_str;
    use vcdgen_core::TimeUnit;

    #[test]
    fn header_options_from_full_table() {
        let toml = r#"
[header]
date = "Aug 27, 2021"
version = "VCD generator tool version V0.1"
timescale = "10ns"
"#;
        let config = load_config_from_str(toml).unwrap();
        let header = config.header.to_header_options().unwrap();
        assert_eq!(header.date.as_deref(), Some("Aug 27, 2021"));
        assert_eq!(header.version, "VCD generator tool version V0.1");
        assert_eq!(header.timescale.magnitude(), 10);
        assert_eq!(header.timescale.unit(), TimeUnit::Ns);
    }

    #[test]
    fn header_options_defaults() {
        let header = HeaderConfig::default().to_header_options().unwrap();
        assert_eq!(header, HeaderOptions::default());
    }

    #[test]
    fn timescale_variants() {
        for (input, expected) in [("1s", "1s"), ("100 ms", "100ms"), ("10US", "10us")] {
            let cfg = HeaderConfig {
                timescale: Some(input.to_string()),
                ..HeaderConfig::default()
            };
            assert_eq!(cfg.timescale().unwrap().unwrap().to_string(), expected);
        }
    }

    #[test]
    fn bad_timescale_names_field() {
        let cfg = HeaderConfig {
            timescale: Some("3ns".to_string()),
            ..HeaderConfig::default()
        };
        match cfg.to_header_options().unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "header.timescale"),
            other => panic!("unexpected error: {other}"),
        }
    }
}
