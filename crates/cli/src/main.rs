mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use digital_register_core::{LogLevel, DEFAULT_IMPORT_PAGE_SIZE};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Crates whose log level follows `LOGGING_LEVEL`.
const SERVICE_TARGETS: [&str; 7] = [
    "digital_register",
    "digital_register_core",
    "digital_register_storage",
    "digital_register_search",
    "digital_register_queue",
    "digital_register_service",
    "digital_register_http",
];

#[derive(Parser)]
#[command(name = "digital-register")]
#[command(about = "Title register lookup and search API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        #[arg(short, long, default_value = "8004")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Import UPRN -> LR UPRN mappings from a CSV file
    ImportUprnMapping {
        /// Source CSV file path
        #[arg(short, long)]
        file: PathBuf,
        /// Number of first records to skip
        #[arg(short, long, default_value_t = 0)]
        skip: usize,
        /// Overwrite existing records
        #[arg(short, long)]
        overwrite: bool,
        /// Clear the mapping table before the import
        #[arg(short, long)]
        clear: bool,
        /// Number of records saved to the database at once
        #[arg(short, long, default_value_t = DEFAULT_IMPORT_PAGE_SIZE)]
        page_size: usize,
    },
}

/// `RUST_LOG` wins; otherwise this service's crates log at `LOGGING_LEVEL`
/// and everything else at `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = LogLevel::parse(std::env::var("LOGGING_LEVEL").ok().as_deref()).as_directive();
        let mut directives = vec!["warn".to_owned(), format!("tower_http={level}")];
        directives.extend(SERVICE_TARGETS.iter().map(|target| format!("{target}={level}")));
        EnvFilter::new(directives.join(","))
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, host).await?,
        Commands::ImportUprnMapping { file, skip, overwrite, clear, page_size } => {
            commands::import_uprn::run(file, skip, overwrite, clear, page_size).await?;
        },
    }

    Ok(())
}
