//! Artifact manager for persisting a run's outputs.
//!
//! Layout under the output directory:
//!
//! ```text
//! performance.csv
//! chart_1m.svg  chart_3m.svg  chart_6m.svg  chart_1y.svg
//! main_chart.svg
//! interactive.html
//! manifest.json
//! ```
//!
//! Only the sinks enabled in [`OutputConfig`] are written.

mod manifest;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use perfwatch_core::config::OutputConfig;
use perfwatch_core::domain::{PerformanceTable, Window};
use perfwatch_core::Sink;

use crate::{export, html, svg};

pub use manifest::{
    read_manifest, write_manifest, RowCounts, RunInfo, RunManifest, MANIFEST_SCHEMA_VERSION,
};

pub const CSV_FILE: &str = "performance.csv";
pub const MAIN_CHART_FILE: &str = "main_chart.svg";
pub const INTERACTIVE_FILE: &str = "interactive.html";
pub const MANIFEST_FILE: &str = "manifest.json";

pub fn window_chart_file(window: Window) -> String {
    format!("chart_{}.svg", window.key())
}

/// Artifact paths returned after export.
#[derive(Debug, Clone, Default)]
pub struct ArtifactPaths {
    pub csv: Option<PathBuf>,
    pub window_charts: Vec<(Window, PathBuf)>,
    pub main_chart: Option<PathBuf>,
    pub interactive: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
}

impl ArtifactPaths {
    /// Every written file, in write order.
    pub fn all(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = Vec::new();
        paths.extend(self.csv.as_deref());
        paths.extend(self.window_charts.iter().map(|(_, p)| p.as_path()));
        paths.extend(self.main_chart.as_deref());
        paths.extend(self.interactive.as_deref());
        paths.extend(self.manifest.as_deref());
        paths
    }
}

/// Manages writing all artifacts for a run.
#[derive(Debug, Clone)]
pub struct ArtifactManager {
    output_dir: PathBuf,
}

impl ArtifactManager {
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&output_dir).with_context(|| {
            format!("Failed to create output directory {}", output_dir.display())
        })?;
        Ok(Self { output_dir })
    }

    /// Write the enabled sinks for `table`.
    pub fn save(
        &self,
        table: &PerformanceTable,
        run: Option<&RunInfo>,
        output: &OutputConfig,
    ) -> Result<ArtifactPaths> {
        let mut paths = ArtifactPaths::default();

        if output.enabled(Sink::Csv) {
            let path = self.output_dir.join(CSV_FILE);
            export::write_table_csv(table, &path)?;
            paths.csv = Some(path);
        }

        if output.enabled(Sink::Charts) {
            for window in Window::ALL {
                let path = self.output_dir.join(window_chart_file(window));
                let chart = svg::render_window_chart(&table.rows, window, output.top_n);
                write_text(&path, &chart)?;
                paths.window_charts.push((window, path));
            }
            let path = self.output_dir.join(MAIN_CHART_FILE);
            write_text(&path, &svg::render_main_chart(&table.rows))?;
            paths.main_chart = Some(path);
        }

        if output.enabled(Sink::Interactive) {
            let path = self.output_dir.join(INTERACTIVE_FILE);
            write_text(&path, &html::render_interactive(&table.rows, output.top_n)?)?;
            paths.interactive = Some(path);
        }

        if output.enabled(Sink::Manifest) {
            let path = self.output_dir.join(MANIFEST_FILE);
            let files = paths
                .all()
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect();
            write_manifest(&path, &RunManifest::new(table, run, files))?;
            paths.manifest = Some(path);
        }

        tracing::info!(
            dir = %self.output_dir.display(),
            files = paths.all().len(),
            rows = table.len(),
            "artifacts written"
        );
        Ok(paths)
    }
}

/// Create `output_dir` and write the enabled sinks into it.
pub fn save_artifacts(
    table: &PerformanceTable,
    run: Option<&RunInfo>,
    output_dir: &Path,
    output: &OutputConfig,
) -> Result<ArtifactPaths> {
    ArtifactManager::new(output_dir)?.save(table, run, output)
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::debug!(path = %path.display(), bytes = content.len(), "wrote artifact");
    Ok(())
}
