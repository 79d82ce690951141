//! CLI application for receipt OCR and field extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, models, process};

/// Receipt OCR - Extract vendor, totals, dates and line items from receipt photos
#[derive(Parser)]
#[command(name = "rxtract")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recognize and extract a single receipt image
    Process(process::ProcessArgs),

    /// Extract fields from already recognized text
    Extract(extract::ExtractArgs),

    /// Process multiple receipt images
    Batch(batch::BatchArgs),

    /// Manage OCR models
    Models(models::ModelsArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Process(args) => process::run(args, &config).await,
        Commands::Extract(args) => extract::run(args, &config).await,
        Commands::Batch(args) => batch::run(args, &config).await,
        Commands::Models(args) => models::run(args, &config).await,
        Commands::Config(args) => config::run(args, cli.config.as_deref()).await,
    }
}
