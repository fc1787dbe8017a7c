//! Symbol catalog: the list of investments to track.
//!
//! The catalog is a CSV file with a header row containing at least
//! `Investment Name` and `Symbol`. Other columns are ignored. Entries keep
//! file order; duplicate symbols are allowed and symbols are not validated.

use std::io::Read;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::domain::CatalogEntry;

pub const NAME_COLUMN: &str = "Investment Name";
pub const SYMBOL_COLUMN: &str = "Symbol";

/// Fatal errors while loading the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("cannot read catalog '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("catalog is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("malformed catalog record at line {line}: {reason}")]
    Malformed { line: u64, reason: String },

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(rename = "Investment Name")]
    name: String,
    #[serde(rename = "Symbol")]
    symbol: String,
}

/// Load a catalog from a CSV file.
pub fn load_catalog(path: &Path) -> Result<Vec<CatalogEntry>, CatalogError> {
    let file = std::fs::File::open(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_catalog(file)
}

/// Parse a catalog from any reader.
pub fn read_catalog<R: Read>(reader: R) -> Result<Vec<CatalogEntry>, CatalogError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    for required in [NAME_COLUMN, SYMBOL_COLUMN] {
        if !headers.iter().any(|h| h.trim_start_matches('\u{feff}') == required) {
            return Err(CatalogError::MissingColumn(required));
        }
    }
    // A UTF-8 BOM on the first header would otherwise hide the column from serde.
    if headers.get(0).is_some_and(|h| h.starts_with('\u{feff}')) {
        let cleaned: csv::StringRecord = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}'))
            .collect();
        rdr.set_headers(cleaned);
    }

    let mut entries = Vec::new();
    for result in rdr.deserialize::<CatalogRecord>() {
        let record = result.map_err(|e| CatalogError::Malformed {
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        entries.push(CatalogEntry::new(record.name, record.symbol));
    }

    Ok(entries)
}
