//! The sample config and catalog at the workspace root stay loadable.

use std::path::PathBuf;

use perfwatch_core::{load_catalog, AppConfig};

fn workspace_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("..")
}

#[test]
fn sample_config_matches_defaults() {
    let config = AppConfig::from_file(&workspace_root().join("perfwatch.toml")).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn sample_catalog_loads() {
    let entries = load_catalog(&workspace_root().join("data/symbol_mapping.csv")).unwrap();
    assert_eq!(entries.len(), 8);
    assert_eq!(entries[0].symbol, "SPY");
    assert!(entries.iter().any(|e| e.symbol == "BRK-B"));
}
