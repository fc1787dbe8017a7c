//! perfwatch report: everything downstream of the aggregated table.
//!
//! - Flat CSV export/import with display column names
//! - Top-N ranking per window
//! - Static SVG charts (per window, grouped main chart)
//! - Self-contained interactive HTML dashboard
//! - Run manifest and the artifact manager that writes the enabled sinks

pub mod artifacts;
pub mod export;
pub mod html;
pub mod ranking;
pub mod svg;

pub use artifacts::{save_artifacts, ArtifactManager, ArtifactPaths, RunInfo, RunManifest};
pub use export::{export_rows_csv, import_rows_csv, read_table_csv, write_table_csv};
pub use html::render_interactive;
pub use ranking::{top_n, value_range, DEFAULT_TOP_N};
pub use svg::{render_main_chart, render_window_chart};
