//! marksheet CLI — look up a student's best marks from a spreadsheet.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "marksheet",
    version,
    about = "Student mark lookup from assignment spreadsheets"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate a student and print their best marks
    Lookup {
        /// Enrollment id
        #[arg(long)]
        enrollment: String,

        /// Access code from the credential sheet
        #[arg(long)]
        access_code: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,

        /// Also save the JSON report to this file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Check the sheet for rows that can never match or marks that read as ungraded
    Validate {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create starter config and a sample sheet snapshot
    Init,
}

#[tokio::main]
async fn main() {
    let filter = match "marksheet=info".parse::<tracing_subscriber::filter::Directive>() {
        Ok(directive) => tracing_subscriber::EnvFilter::from_default_env().add_directive(directive),
        Err(_) => tracing_subscriber::EnvFilter::from_default_env(),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lookup {
            enrollment,
            access_code,
            format,
            output,
            config,
        } => commands::lookup::execute(enrollment, access_code, format, output, config).await,
        Commands::Validate { config } => commands::validate::execute(config).await,
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
