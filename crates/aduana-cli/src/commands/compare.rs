//! Compare command - reconcile invoiced quantities against declared ones.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{error, warn};

use aduana_core::compare::{COMPARISON_COLUMNS, compare};
use aduana_core::declaration::ProductExtractor;
use aduana_core::invoice::ParserChain;
use aduana_core::models::invoice::InvoiceLine;
use aduana_core::models::record::ProductRecord;

use super::invoices::load_document;
use super::{OutputFormat, expand_inputs, load_config, progress_bar, source_name, to_csv, write_output};

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// Declaration text files or glob pattern
    #[arg(long, required = true)]
    declarations: String,

    /// Invoice documents (JSON) or glob pattern
    #[arg(long, required = true)]
    invoices: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

pub fn run(args: CompareArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let declaration_files = expand_inputs(&args.declarations, &["txt"])?;
    let invoice_files = expand_inputs(&args.invoices, &["json"])?;
    eprintln!(
        "{} Comparing {} invoice files against {} declaration files",
        style("ℹ").blue(),
        invoice_files.len(),
        declaration_files.len()
    );

    let extractor = ProductExtractor::from_config(&config.declarations);
    let chain = ParserChain::from_config(&config.invoices);
    let pb = progress_bar(declaration_files.len() + invoice_files.len())?;

    let mut products: Vec<ProductRecord> = Vec::new();
    let mut lines: Vec<InvoiceLine> = Vec::new();
    let mut failed: Vec<(PathBuf, String)> = Vec::new();

    for path in &declaration_files {
        match fs::read_to_string(path) {
            Ok(text) => {
                let extraction = extractor.extract(&text, &source_name(path));
                products.extend(extraction.records);
            }
            Err(e) if args.continue_on_error => {
                warn!("Failed to read {}: {}", path.display(), e);
                failed.push((path.clone(), e.to_string()));
            }
            Err(e) => {
                error!("Failed to read {}: {}", path.display(), e);
                anyhow::bail!("Processing failed: {}: {}", path.display(), e);
            }
        }
        pb.inc(1);
    }

    for path in &invoice_files {
        match load_document(path) {
            Ok(doc) => {
                if let Some(table) = chain.parse(&doc).table {
                    lines.extend(table.rows);
                }
            }
            Err(e) if args.continue_on_error => {
                warn!("Failed to process {}: {}", path.display(), e);
                failed.push((path.clone(), e.to_string()));
            }
            Err(e) => {
                error!("Failed to process {}: {}", path.display(), e);
                anyhow::bail!("Processing failed: {}: {}", path.display(), e);
            }
        }
        pb.inc(1);
    }

    pb.finish_and_clear();

    let rows = compare(&lines, &products);
    let content = match args.format {
        OutputFormat::Csv => {
            let columns: Vec<String> = COMPARISON_COLUMNS.iter().map(|c| c.to_string()).collect();
            to_csv(&columns, rows.iter().map(|row| row.cells()))?
        }
        OutputFormat::Json => serde_json::to_string_pretty(&rows)?,
    };
    write_output(args.output.as_deref(), &content)?;

    let mismatches = rows.iter().filter(|row| !row.status.is_ok()).count();
    eprintln!(
        "{} Compared {} invoice lines with {} declared products: {} references, {} mismatched ({:?})",
        style("✓").green(),
        lines.len(),
        products.len(),
        rows.len(),
        mismatches,
        start.elapsed()
    );

    if !failed.is_empty() {
        eprintln!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            eprintln!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}
