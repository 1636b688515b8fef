mod commands;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "drift")]
#[command(
    about = "Detect drift between declared infrastructure and live resources",
    long_about = None
)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Console,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Compare state files against a live snapshot
    Scan {
        /// State file, directory or glob pattern
        #[arg(long, env = "DRIFT_STATE")]
        from: String,
        /// Live inventory snapshot (JSON)
        #[arg(long)]
        snapshot: PathBuf,
        /// Ignore file (defaults to DRIFTIGNORE_PATH, then ./.driftignore)
        #[arg(long)]
        driftignore: Option<PathBuf>,
        /// Maximum concurrent reads per resource type
        #[arg(long, env = "DRIFT_PARALLELISM", default_value_t = driftflow_remote::DEFAULT_PARALLELISM)]
        parallelism: usize,
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Console)]
        output: OutputFormat,
        /// Restrict the scan to these resource types
        #[arg(long, value_delimiter = ',')]
        only_types: Vec<String>,
        /// Field metadata file (JSON)
        #[arg(long)]
        schema: Option<PathBuf>,
        /// Fail when a resource type could not be scanned
        #[arg(long)]
        strict: bool,
    },
    /// Generate .driftignore lines from a JSON analysis
    GenDriftignore {
        /// Analysis file (reads stdin when omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Leave out resources not covered by IaC
        #[arg(long)]
        exclude_unmanaged: bool,
        /// Leave out missing resources
        #[arg(long)]
        exclude_deleted: bool,
        /// Leave out changed resources
        #[arg(long)]
        exclude_drifted: bool,
    },
    /// Show version information
    Version,
}

/// Exit code when drift is found
const EXIT_DRIFT: i32 = 1;
/// Exit code when the command itself failed
const EXIT_ERROR: i32 = 2;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the report
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match run(cli.command).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(EXIT_DRIFT),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(EXIT_ERROR);
        }
    }
}

/// Returns whether the infrastructure is in sync
async fn run(command: Commands) -> anyhow::Result<bool> {
    match command {
        Commands::Scan {
            from,
            snapshot,
            driftignore,
            parallelism,
            output,
            only_types,
            schema,
            strict,
        } => {
            commands::scan::handle(commands::scan::ScanOptions {
                from,
                snapshot,
                driftignore,
                parallelism,
                output,
                only_types,
                schema,
                strict,
            })
            .await
        }
        Commands::GenDriftignore {
            input,
            exclude_unmanaged,
            exclude_deleted,
            exclude_drifted,
        } => {
            commands::gen_driftignore::handle(
                input,
                driftflow_filter::AnalysisListOptions {
                    include_unmanaged: !exclude_unmanaged,
                    include_deleted: !exclude_deleted,
                    include_drifted: !exclude_drifted,
                },
            )
            .await?;
            Ok(true)
        }
        Commands::Version => {
            println!("driftflow {}", env!("CARGO_PKG_VERSION"));
            Ok(true)
        }
    }
}
