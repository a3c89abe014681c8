//! Parsing and validation of `vcdgen.toml` configuration files.
//!
//! The configuration supplies the document header (`$date`, `$version`,
//! `$timescale`) and a default output path. Every field is optional.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, load_config_or_default};
pub use types::*;
