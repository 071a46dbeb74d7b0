//! CSV table reader.
//!
//! Reads a header row, locates the region, category, and period columns,
//! and turns each data row into a [`RawRecord`]. Columns that are neither
//! are ignored.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crime_explorer::RecordStore;
use crime_explorer_models::{Period, RawRecord};

use crate::{IngestConfig, IngestError};

/// The records and period columns of one table.
#[derive(Debug, Clone, Default)]
pub struct IngestedTable {
    /// Period columns in chronological order.
    pub periods: Vec<Period>,
    /// One record per data row, including rows with an empty region.
    pub records: Vec<RawRecord>,
}

impl IngestedTable {
    /// Builds the immutable record store for this table.
    #[must_use]
    pub fn into_store(self) -> RecordStore {
        RecordStore::with_periods(self.records, self.periods)
    }
}

/// Reads crime tables according to an [`IngestConfig`].
#[derive(Debug, Clone)]
pub struct TableReader {
    config: IngestConfig,
    /// Whether input is gzip-compressed.
    is_gzipped: bool,
    /// Optional cap on the number of data rows.
    max_records: Option<u64>,
}

impl TableReader {
    /// Creates a reader for uncompressed input with no row limit.
    #[must_use]
    pub const fn new(config: IngestConfig) -> Self {
        Self {
            config,
            is_gzipped: false,
            max_records: None,
        }
    }

    /// Marks input as gzip-compressed.
    #[must_use]
    pub const fn with_gzip(mut self, gzipped: bool) -> Self {
        self.is_gzipped = gzipped;
        self
    }

    /// Stops after `max` data rows.
    #[must_use]
    pub const fn with_max_records(mut self, max: u64) -> Self {
        self.max_records = Some(max);
        self
    }

    /// Reads a table from a file. Files ending in `.gz` are decompressed
    /// regardless of [`Self::with_gzip`].
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] if the file cannot be opened or parsed.
    pub fn read_path(&self, path: &Path) -> Result<IngestedTable, IngestError> {
        log::info!("Reading crime table from {}", path.display());
        let file = BufReader::new(File::open(path)?);
        let gzipped = self.is_gzipped || path.extension().is_some_and(|ext| ext == "gz");

        if gzipped {
            self.read_plain(flate2::read::GzDecoder::new(file))
        } else {
            self.read_plain(file)
        }
    }

    /// Reads a table from any reader, decompressing first if configured.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError`] on malformed CSV, a missing region or
    /// category column, or a header without period columns.
    pub fn read<R: Read>(&self, reader: R) -> Result<IngestedTable, IngestError> {
        if self.is_gzipped {
            self.read_plain(flate2::read::GzDecoder::new(reader))
        } else {
            self.read_plain(reader)
        }
    }

    fn read_plain<R: Read>(&self, reader: R) -> Result<IngestedTable, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(self.config.delimiter_byte()?)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_owned())
            .collect();

        let region_idx = column_index(&headers, &self.config.region_column)?;
        let category_idx = column_index(&headers, &self.config.category_column)?;

        let mut period_columns: Vec<(usize, Period)> = headers
            .iter()
            .enumerate()
            .filter_map(|(i, h)| Period::parse(h).ok().map(|p| (i, p)))
            .collect();
        if period_columns.is_empty() {
            return Err(IngestError::NoPeriodColumns);
        }
        period_columns.sort_by(|a, b| a.1.cmp(&b.1));

        let mut records = Vec::new();
        let mut regionless = 0_u64;

        for row in reader.records() {
            let row = row?;
            let cell = |i: usize| row.get(i).unwrap_or("").trim();

            let mut record = RawRecord::new(cell(region_idx), cell(category_idx));
            for (i, period) in &period_columns {
                record.add_cell(period.clone(), cell(*i));
            }
            if !record.has_region() {
                regionless += 1;
            }
            records.push(record);

            if let Some(max) = self.max_records
                && records.len() as u64 >= max
            {
                log::info!("Reached max_records limit ({max}), stopping CSV parse");
                break;
            }
        }

        if regionless > 0 {
            log::debug!("{regionless} rows have no region and will not be aggregated");
        }
        log::info!(
            "Parsed {} rows across {} period columns",
            records.len(),
            period_columns.len()
        );

        let mut periods: Vec<Period> = period_columns.into_iter().map(|(_, p)| p).collect();
        periods.dedup();

        Ok(IngestedTable { periods, records })
    }
}

fn column_index(headers: &[String], column: &str) -> Result<usize, IngestError> {
    headers
        .iter()
        .position(|h| h == column)
        .ok_or_else(|| IngestError::MissingColumn {
            column: column.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use crime_explorer_models::CategoryFilter;

    use super::*;

    const SAMPLE: &str = "\
MajorText,MinorText,BoroughName,202402,202401
Burglary,Domestic,Camden,5,10
Burglary,Domestic,Hackney,2,2
Robbery,Personal,Camden,x,3
Robbery,Personal,,9,9
";

    fn read(input: &str) -> Result<IngestedTable, IngestError> {
        TableReader::new(IngestConfig::default()).read(input.as_bytes())
    }

    fn period(key: &str) -> Period {
        Period::parse(key).unwrap()
    }

    #[test]
    fn reads_period_columns_in_order() {
        let table = read(SAMPLE).unwrap();
        assert_eq!(table.periods, [period("202401"), period("202402")]);
        assert_eq!(table.records.len(), 4);
    }

    #[test]
    fn maps_cells_to_records() {
        let table = read(SAMPLE).unwrap();
        let camden = &table.records[0];
        assert_eq!(camden.region, "Camden");
        assert_eq!(camden.category, "Burglary");
        assert_eq!(camden.count_at(&period("202401")), 10);
        assert_eq!(camden.count_at(&period("202402")), 5);
    }

    #[test]
    fn non_numeric_cells_become_zero() {
        let table = read(SAMPLE).unwrap();
        assert_eq!(table.records[2].count_at(&period("202402")), 0);
        assert_eq!(table.records[2].count_at(&period("202401")), 3);
    }

    #[test]
    fn regionless_rows_are_kept_but_not_indexed() {
        let store = read(SAMPLE).unwrap().into_store();
        assert_eq!(store.records().len(), 4);
        assert_eq!(store.regions(), ["Camden", "Hackney"]);
        assert_eq!(store.categories(), ["Burglary", "Robbery"]);
    }

    #[test]
    fn categories_only_on_regionless_rows_are_not_offered() {
        let store = read("BoroughName,MajorText,202401,202402
Camden,Theft,1,2
,Arson,5,5
")
            .unwrap()
            .into_store();
        assert_eq!(store.categories(), ["Theft"]);
        assert!(!store.category_options().contains(&CategoryFilter::from("Arson")));
    }

    #[test]
    fn short_rows_are_padded() {
        let table = read("BoroughName,MajorText,202401,202402\nCamden,Theft,4\n").unwrap();
        assert_eq!(table.records[0].count_at(&period("202401")), 4);
        assert_eq!(table.records[0].count_at(&period("202402")), 0);
    }

    #[test]
    fn missing_region_column_is_an_error() {
        let err = read("Borough,MajorText,202401\nCamden,Theft,1\n").unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { column } if column == "BoroughName"));
    }

    #[test]
    fn header_without_periods_is_an_error() {
        let err = read("BoroughName,MajorText,Jan\nCamden,Theft,1\n").unwrap_err();
        assert!(matches!(err, IngestError::NoPeriodColumns));
    }

    #[test]
    fn custom_columns_and_delimiter() {
        let config = IngestConfig {
            region_column: "Area".to_string(),
            category_column: "Type".to_string(),
            delimiter: ';',
        };
        let table = TableReader::new(config)
            .read("Area;Type;202401\nNorth;Arson;7\n".as_bytes())
            .unwrap();
        assert_eq!(table.records[0].region, "North");
        assert_eq!(table.records[0].count_at(&period("202401")), 7);
    }

    #[test]
    fn max_records_limits_rows() {
        let table = TableReader::new(IngestConfig::default())
            .with_max_records(2)
            .read(SAMPLE.as_bytes())
            .unwrap();
        assert_eq!(table.records.len(), 2);
    }

    #[test]
    fn reads_gzipped_input() {
        let mut encoder =
            flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(SAMPLE.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let table = TableReader::new(IngestConfig::default())
            .with_gzip(true)
            .read(compressed.as_slice())
            .unwrap();
        assert_eq!(table.records.len(), 4);
    }
}
