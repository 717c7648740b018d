//! The `marksheet validate` command.

use std::path::PathBuf;

use anyhow::Result;

use marksheet_core::traits::fetch_tables;
use marksheet_core::validate::validate_tables;
use marksheet_sheets::config::load_config_from;
use marksheet_sheets::create_configured_source;

pub async fn execute(config_path: Option<PathBuf>) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let source = create_configured_source(&config)?;
    let tables = fetch_tables(source.as_ref(), &config.layout).await?;

    println!(
        "Source: {} ({} assignment rows, {} credential rows)",
        source.name(),
        tables.assignments.len(),
        tables.credentials.len()
    );

    let warnings = validate_tables(&tables.assignments, &tables.credentials);
    if !warnings.is_empty() {
        tracing::warn!(count = warnings.len(), "sheet has validation warnings");
    }
    for w in &warnings {
        let prefix = w
            .row
            .map(|row| format!("  [{} row {row}]", w.table))
            .unwrap_or_else(|| format!("  [{}]", w.table));
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Sheet valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
