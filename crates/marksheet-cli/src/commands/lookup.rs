//! The `marksheet lookup` command.

use std::path::PathBuf;

use anyhow::Result;

use marksheet_core::lookup::{lookup, LookupOutcome};
use marksheet_core::model::{AuthQuery, StudentSummary};
use marksheet_core::report::LookupReport;
use marksheet_core::traits::fetch_tables;
use marksheet_sheets::config::load_config_from;
use marksheet_sheets::create_configured_source;

pub async fn execute(
    enrollment: String,
    access_code: String,
    format: String,
    output: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(
        matches!(format.as_str(), "text" | "json"),
        "unknown format '{format}' (expected text or json)"
    );

    // Blank fields are rejected before touching the network.
    let outcome = match AuthQuery::new(&enrollment, &access_code) {
        Err(e) => LookupOutcome::InvalidQuery(e),
        Ok(_) => {
            let config = load_config_from(config_path.as_deref())?;
            let source = create_configured_source(&config)?;
            tracing::debug!(source = source.name(), "fetching sheet tables");
            let tables = fetch_tables(source.as_ref(), &config.layout).await?;
            lookup(
                &tables.assignments,
                &tables.credentials,
                &enrollment,
                &access_code,
            )
        }
    };

    let report = LookupReport::new(&enrollment, &outcome);

    if let Some(path) = &output {
        report.save_json(path)?;
        eprintln!("Report saved to: {}", path.display());
    }

    match format.as_str() {
        "json" => println!("{}", report.to_json_pretty()?),
        _ => match outcome.summary() {
            Some(summary) => print_summary(summary),
            None => println!(
                "{}: {}",
                report.status,
                report.message.as_deref().unwrap_or_default()
            ),
        },
    }

    if !outcome.is_success() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(summary: &StudentSummary) {
    use comfy_table::{Cell, Table};

    println!("Name: {}", summary.name);
    println!("Phone: {}", summary.phone);
    println!("Total Marks: {}", summary.total_marks);
    println!("Average Marks: {}", summary.average_display());
    println!("Assignments Attempted: {}", summary.attempted_count);

    let mut table = Table::new();
    table.set_header(vec!["Assignment", "Best Marks"]);
    for a in &summary.assignments {
        let marks = match a.marks {
            Some(m) => m.to_string(),
            None => "Not graded".to_string(),
        };
        table.add_row(vec![Cell::new(&a.assignment_id), Cell::new(marks)]);
    }

    println!("\n{table}");
}
