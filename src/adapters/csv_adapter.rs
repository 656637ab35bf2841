//! CSV file data adapter.
//!
//! Reads a single file of stacked daily bars. Columns are matched by header
//! name, case-insensitively: `date`, `open`, `high`, `low`, `close` are
//! required; `symbol` and `volume` are optional.

use crate::domain::cleaning::{clean_rows, CleanedData, RawRow};
use crate::domain::error::SmatraderError;
use crate::ports::data_port::DataPort;
use std::path::{Path, PathBuf};

pub struct CsvAdapter {
    path: PathBuf,
    default_symbol: String,
}

struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    symbol: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, SmatraderError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name).ok_or_else(|| SmatraderError::Data {
                reason: format!("missing required column: {}", name),
            })
        };

        Ok(Columns {
            date: require("date")?,
            open: require("open")?,
            high: require("high")?,
            low: require("low")?,
            close: require("close")?,
            symbol: find("symbol"),
            volume: find("volume"),
        })
    }
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize) -> Option<&'r str> {
    record.get(idx).map(str::trim).filter(|v| !v.is_empty())
}

fn number(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    field(record, idx).and_then(|v| v.parse().ok())
}

impl CsvAdapter {
    /// Rows without a `symbol` value are assigned to `default_symbol`.
    pub fn new(path: PathBuf, default_symbol: impl Into<String>) -> Self {
        Self {
            path,
            default_symbol: default_symbol.into(),
        }
    }

    /// Symbol derived from the file stem, e.g. `AAPL` for `data/AAPL.csv`.
    pub fn symbol_from_path(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_uppercase())
            .unwrap_or_else(|| "UNKNOWN".to_string())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn default_symbol(&self) -> &str {
        &self.default_symbol
    }

    /// Parse every row without cleaning. Unparseable numbers become `None`.
    pub fn read_rows(&self) -> Result<Vec<RawRow>, SmatraderError> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)
            .map_err(|e| SmatraderError::Data {
                reason: format!("failed to read {}: {}", self.path.display(), e),
            })?;

        let headers = rdr.headers().map_err(|e| SmatraderError::Data {
            reason: format!("CSV header error: {}", e),
        })?;
        let cols = Columns::from_headers(headers)?;

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| SmatraderError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;

            rows.push(RawRow {
                symbol: cols
                    .symbol
                    .and_then(|i| field(&record, i))
                    .map(str::to_string),
                date: field(&record, cols.date).unwrap_or_default().to_string(),
                open: number(&record, cols.open),
                high: number(&record, cols.high),
                low: number(&record, cols.low),
                close: number(&record, cols.close),
                volume: cols.volume.and_then(|i| number(&record, i)),
            });
        }

        tracing::debug!(path = %self.path.display(), rows = rows.len(), "read price rows");
        Ok(rows)
    }
}

impl DataPort for CsvAdapter {
    fn load_all(&self) -> Result<CleanedData, SmatraderError> {
        Ok(clean_rows(self.read_rows()?, &self.default_symbol))
    }
}
