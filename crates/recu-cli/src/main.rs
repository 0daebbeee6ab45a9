//! CLI application for hybrid receipt extraction and product normalization.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, catalog, normalize, process, stats, translate};

/// Receipt extraction and product normalization for mixed French/English
/// receipts
#[derive(Parser)]
#[command(name = "recu")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Directory for catalog/template/learning JSON stores
    #[arg(short, long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process one OCR-text file through the extraction pipeline
    Process(process::ProcessArgs),

    /// Process multiple OCR-text files
    Batch(batch::BatchArgs),

    /// Normalize a single product name against the catalog
    Normalize(normalize::NormalizeArgs),

    /// Search the product catalog
    Search(catalog::SearchArgs),

    /// Learn a raw-name to product mapping
    Learn(catalog::LearnArgs),

    /// Add a product to the catalog
    Add(catalog::AddArgs),

    /// Translate a product name between French and English
    Translate(translate::TranslateArgs),

    /// Show learning statistics
    Stats(stats::StatsArgs),
}

fn main() -> anyhow::Result<()> {
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
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let context = commands::Context::build(cli.config.as_deref(), cli.data_dir.as_deref())?;

    match cli.command {
        Commands::Process(args) => process::run(args, &context),
        Commands::Batch(args) => batch::run(args, &context),
        Commands::Normalize(args) => normalize::run(args, &context),
        Commands::Search(args) => catalog::run_search(args, &context),
        Commands::Learn(args) => catalog::run_learn(args, &context),
        Commands::Add(args) => catalog::run_add(args, &context),
        Commands::Translate(args) => translate::run(args),
        Commands::Stats(args) => stats::run(args, &context),
    }
}
