//! CLI application for customs declaration and invoice extraction.

mod commands;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{compare, config, invoices, products};

/// Aduana - Extract product records from customs declarations and invoices
#[derive(Parser)]
#[command(name = "aduana")]
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
    /// Extract product records from declaration text files
    Products(products::ProductsArgs),

    /// Extract line items from invoice documents
    Invoices(invoices::InvoicesArgs),

    /// Compare invoiced quantities against declared quantities per reference
    Compare(compare::CompareArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
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
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Products(args) => products::run(args, cli.config.as_deref()),
        Commands::Invoices(args) => invoices::run(args, cli.config.as_deref()),
        Commands::Compare(args) => compare::run(args, cli.config.as_deref()),
        Commands::Config(args) => config::run(args, cli.config.as_deref()),
    }
}
