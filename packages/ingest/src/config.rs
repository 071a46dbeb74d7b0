//! Column mapping for the source table.

use serde::Deserialize;

use crate::IngestError;

/// Which columns hold the region and category, and how fields are
/// delimited. Every header matching `YYYYMM` is treated as a period column.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct IngestConfig {
    /// Header of the region-name column.
    pub region_column: String,
    /// Header of the category column.
    pub category_column: String,
    /// Field delimiter.
    pub delimiter: char,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            region_column: "BoroughName".to_string(),
            category_column: "MajorText".to_string(),
            delimiter: ',',
        }
    }
}

impl IngestConfig {
    /// The delimiter as a single byte, as the CSV reader requires.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Config`] if the delimiter is not ASCII.
    pub fn delimiter_byte(&self) -> Result<u8, IngestError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| IngestError::Config {
                message: format!("delimiter {:?} is not a single ASCII character", self.delimiter),
            })
    }
}

/// Parses an [`IngestConfig`] from TOML.
///
/// # Errors
///
/// Returns [`IngestError::Config`] if the TOML is malformed.
pub fn parse_ingest_toml(toml_str: &str) -> Result<IngestConfig, IngestError> {
    toml::de::from_str(toml_str).map_err(|e| IngestError::Config {
        message: e.to_string(),
    })
}
