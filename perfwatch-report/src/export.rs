//! Flat CSV export of the performance table, and the matching import.
//!
//! Columns: Investment Name, Symbol, 1 Month Performance, 3 Month Performance,
//! 6 Month Performance, 1 Year Performance. A missing metric is an empty
//! cell. Floats are written in shortest round-trip form, so importing an
//! export reproduces every value exactly.

use std::path::Path;

use anyhow::{Context, Result};
use perfwatch_core::domain::{PerformanceRow, PerformanceTable};

/// Serialize rows to CSV text.
pub fn export_rows_csv(rows: &[PerformanceRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    // A table with no rows still gets its header line.
    if rows.is_empty() {
        wtr.write_record(HEADER)?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

const HEADER: [&str; 6] = [
    "Investment Name",
    "Symbol",
    "1 Month Performance",
    "3 Month Performance",
    "6 Month Performance",
    "1 Year Performance",
];

/// Parse rows from CSV text produced by [`export_rows_csv`].
pub fn import_rows_csv(text: &str) -> Result<Vec<PerformanceRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());
    let mut rows = Vec::new();
    for (i, record) in rdr.deserialize::<PerformanceRow>().enumerate() {
        let row = record.with_context(|| format!("malformed performance row {}", i + 1))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Write the table to `path`.
pub fn write_table_csv(table: &PerformanceTable, path: &Path) -> Result<()> {
    let csv = export_rows_csv(&table.rows)?;
    std::fs::write(path, csv).with_context(|| format!("failed to write {}", path.display()))
}

/// Read a table previously written by [`write_table_csv`].
pub fn read_table_csv(path: &Path) -> Result<PerformanceTable> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok(PerformanceTable::new(import_rows_csv(&text)?))
}
