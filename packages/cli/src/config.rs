//! Optional TOML configuration file for the CLI.
//!
//! ```toml
//! [ingest]
//! region_column = "BoroughName"
//! category_column = "MajorText"
//!
//! [colors]
//! low = "rgba(255,245,245,0.7)"
//! high = "#ff2d00"
//! ```

use std::path::Path;

use crime_explorer_ingest::IngestConfig;
use crime_explorer_models::ColorRamp;
use serde::Deserialize;

/// Top-level CLI configuration. Every table is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// Source table column mapping.
    pub ingest: IngestConfig,
    /// Map colors.
    pub colors: ColorRamp,
}

impl CliConfig {
    /// Loads the config at `path`, or the defaults if `path` is `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML.
    pub fn load(path: Option<&Path>) -> Result<Self, Box<dyn std::error::Error>> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        log::debug!("Loading config from {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        Ok(parse_config_toml(&contents)?)
    }
}

/// Parses a [`CliConfig`] from TOML.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or a color cannot be parsed.
pub fn parse_config_toml(toml_str: &str) -> Result<CliConfig, toml::de::Error> {
    toml::de::from_str(toml_str)
}
