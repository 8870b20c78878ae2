//! disaster-etl CLI - load, clean and store disaster response data
//!
//! ```bash
//! disaster-etl disaster_messages.csv disaster_categories.csv DisasterResponse.db
//! ```
//!
//! With the wrong number of arguments the usage text is printed to stdout
//! and the process exits with status 0.

use clap::error::ErrorKind as ClapErrorKind;
use clap::Parser;
use disaster_etl::logs::log_error;
use disaster_etl::{run, PipelineConfig};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Please provide the filepaths of the messages and categories \
datasets as the first and second argument respectively, as \
well as the filepath of the database to save the cleaned data \
to as the third argument. \n\nExample: disaster-etl \
disaster_messages.csv disaster_categories.csv \
DisasterResponse.db";

#[derive(Parser, Debug)]
#[command(name = "disaster-etl", version)]
#[command(about = "Merge messages with their categories and save them to SQLite", long_about = None)]
struct Cli {
    /// Messages CSV file
    messages: PathBuf,

    /// Categories CSV file
    categories: PathBuf,

    /// SQLite database to write
    database: PathBuf,
}

/// Parse the command line.
///
/// `Ok(None)` means the arguments were unusable and the usage text should
/// be shown. `Err` is reserved for `--help` and `--version`.
fn parse_cli<I, T>(args: I) -> Result<Option<Cli>, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Ok(Some(cli)),
        Err(e) if matches!(e.kind(), ClapErrorKind::DisplayHelp | ClapErrorKind::DisplayVersion) => Err(e),
        Err(e) => {
            tracing::debug!(error = %e, "invalid arguments");
            Ok(None)
        }
    }
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    let cli = match parse_cli(std::env::args_os()) {
        Ok(Some(cli)) => cli,
        Ok(None) => {
            println!("{}", USAGE);
            return;
        }
        Err(e) => e.exit(),
    };

    let config = PipelineConfig::new(cli.messages, cli.categories, cli.database);

    match run(&config) {
        Ok(report) => {
            tracing::info!(
                merged = report.merged_rows,
                stored = report.cleaned_rows,
                duplicates = report.duplicates_removed,
                labels = report.labels.len(),
                "pipeline finished"
            );
        }
        Err(e) => {
            log_error(format!("Error during {}: {}", e.stage(), e));
            std::process::exit(1);
        }
    }
}
