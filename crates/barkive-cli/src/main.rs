mod fetch;
mod report;
mod wrangle;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};

use fetch::FetchCommands;

#[derive(Debug, Parser)]
#[command(name = "barkive-cli")]
#[command(about = "Barkive dataset pipeline command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Download source datasets
    Fetch {
        #[command(subcommand)]
        command: FetchCommands,
    },
    /// Clean and merge the three sources into the master table
    Wrangle {
        /// Override the manifest's archive CSV path
        #[arg(long)]
        archive: Option<PathBuf>,
        /// Override the manifest's predictions TSV path
        #[arg(long)]
        predictions: Option<PathBuf>,
        /// Override the manifest's metadata NDJSON path
        #[arg(long)]
        metadata: Option<PathBuf>,
        /// Override the manifest's master table output path
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Print label summaries over the merged table
    Report {
        /// How many labels to show per ranking
        #[arg(long, default_value = "10")]
        top: usize,
        /// Also write the full reports as CSV under the manifest's reports_dir
        #[arg(long)]
        write_csv: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = barkive_core::load_app_config()?;
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("no command given; try `barkive-cli wrangle` or `barkive-cli --help`");
        return Ok(());
    };

    let manifest = barkive_core::load_manifest(&config.manifest_path)
        .with_context(|| format!("loading manifest {}", config.manifest_path.display()))?;

    match command {
        Commands::Fetch { command } => fetch::run_fetch(command, &config, &manifest).await,
        Commands::Wrangle {
            archive,
            predictions,
            metadata,
            out,
        } => wrangle::run_wrangle_cmd(&manifest, archive, predictions, metadata, out),
        Commands::Report { top, write_csv } => report::run_report(&manifest, top, write_csv),
    }
}

/// `RUST_LOG` wins when set; otherwise the configured level applies.
fn init_tracing(log_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Creates the parent directory of an output path if it does not exist.
pub(crate) fn ensure_parent_dir(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
