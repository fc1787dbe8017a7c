//! Run manifest export (JSON).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use perfwatch_core::domain::PerformanceTable;
use perfwatch_core::LookbackBasis;
use serde::{Deserialize, Serialize};

pub const MANIFEST_SCHEMA_VERSION: u32 = 1;

/// How the table was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunInfo {
    pub catalog: PathBuf,
    pub provider: String,
    pub basis: LookbackBasis,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Rows by how many metrics they carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub total: usize,
    /// All four metrics present.
    pub complete: usize,
    /// Some but not all metrics present.
    pub partial: usize,
    /// No metric present.
    pub failed: usize,
}

impl RowCounts {
    pub fn of(table: &PerformanceTable) -> Self {
        let mut counts = RowCounts {
            total: table.len(),
            ..Default::default()
        };
        for row in &table.rows {
            let present = row.values().iter().filter(|v| v.is_some()).count();
            match present {
                0 => counts.failed += 1,
                4 => counts.complete += 1,
                _ => counts.partial += 1,
            }
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub schema_version: u32,
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<RunInfo>,
    pub counts: RowCounts,
    pub failed_symbols: Vec<String>,
    /// Artifact file names, relative to the manifest.
    pub files: Vec<String>,
}

impl RunManifest {
    pub fn new(table: &PerformanceTable, run: Option<&RunInfo>, files: Vec<String>) -> Self {
        Self {
            schema_version: MANIFEST_SCHEMA_VERSION,
            generated_at: Utc::now(),
            run: run.cloned(),
            counts: RowCounts::of(table),
            failed_symbols: table.failed_symbols().into_iter().map(String::from).collect(),
            files,
        }
    }
}

pub fn write_manifest(path: &Path, manifest: &RunManifest) -> Result<()> {
    let json = serde_json::to_string_pretty(manifest).context("Failed to serialize run manifest")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write manifest to {}", path.display()))?;
    Ok(())
}

pub fn read_manifest(path: &Path) -> Result<RunManifest> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read manifest {}", path.display()))?;
    serde_json::from_str(&text).context("Failed to parse run manifest")
}

#[cfg(test)]
mod tests {
    use super::*;
    use perfwatch_core::domain::{CatalogEntry, PerformanceRow};

    fn table() -> PerformanceTable {
        PerformanceTable::new(vec![
            PerformanceRow::new(
                &CatalogEntry::new("Apple", "AAPL"),
                [Some(1.0), Some(2.0), Some(3.0), Some(4.0)],
            ),
            PerformanceRow::new(
                &CatalogEntry::new("Young", "YNG"),
                [Some(1.0), Some(2.0), Some(3.0), None],
            ),
            PerformanceRow::failed(&CatalogEntry::new("BadCo", "ZZZZ9")),
        ])
    }

    #[test]
    fn counts_by_presence() {
        assert_eq!(
            RowCounts::of(&table()),
            RowCounts {
                total: 3,
                complete: 1,
                partial: 1,
                failed: 1
            }
        );
    }

    #[test]
    fn manifest_file_roundtrip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("manifest.json");
        let run = RunInfo {
            catalog: PathBuf::from("data/symbol_mapping.csv"),
            provider: "synthetic".into(),
            basis: LookbackBasis::Rows,
            start: NaiveDate::from_ymd_opt(2023, 5, 25).unwrap(),
            end: NaiveDate::from_ymd_opt(2024, 6, 28).unwrap(),
        };
        let manifest = RunManifest::new(&table(), Some(&run), vec!["performance.csv".into()]);
        write_manifest(&path, &manifest).unwrap();

        let loaded = read_manifest(&path).unwrap();
        assert_eq!(loaded, manifest);
        assert_eq!(loaded.schema_version, MANIFEST_SCHEMA_VERSION);
        assert_eq!(loaded.failed_symbols, vec!["ZZZZ9".to_string()]);
        assert_eq!(loaded.run.unwrap().basis, LookbackBasis::Rows);
    }

    #[test]
    fn run_info_is_optional() {
        let manifest = RunManifest::new(&table(), None, vec![]);
        let json = serde_json::to_string(&manifest).unwrap();
        assert!(!json.contains("\"run\""));
        let back: RunManifest = serde_json::from_str(&json).unwrap();
        assert!(back.run.is_none());
    }
}
