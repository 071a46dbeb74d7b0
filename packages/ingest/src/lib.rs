#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Reader for borough-by-month crime count tables.
//!
//! The source table has one row per region and category and one column per
//! month (`YYYYMM`). [`TableReader`] turns such a table into
//! [`crime_explorer_models::RawRecord`]s and a [`crime_explorer::RecordStore`].

pub mod config;
pub mod table;

pub use config::{IngestConfig, parse_ingest_toml};
pub use table::{IngestedTable, TableReader};

/// Errors that can occur while reading a crime table.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// I/O error (file open or decompression).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Name of the missing column.
        column: String,
    },

    /// No header matched the `YYYYMM` period pattern.
    #[error("No period (YYYYMM) columns found in header")]
    NoPeriodColumns,

    /// The ingest configuration is invalid.
    #[error("Config error: {message}")]
    Config {
        /// Description of what went wrong.
        message: String,
    },
}
