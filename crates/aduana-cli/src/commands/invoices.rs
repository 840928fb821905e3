//! Invoices command - extract line items from invoice documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{error, warn};

use aduana_core::invoice::ParserChain;
use aduana_core::models::invoice::{CellValue, InvoiceDocument, InvoiceLine, InvoiceTable};

use super::{OutputFormat, expand_inputs, load_config, progress_bar, source_name, to_csv, write_output};

/// Arguments for the invoices command.
#[derive(Args)]
pub struct InvoicesArgs {
    /// Input invoice documents (JSON) or glob pattern
    #[arg(required = true)]
    input: String,

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

pub fn run(args: InvoicesArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = expand_inputs(&args.input, &["json"])?;
    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let chain = ParserChain::from_config(&config.invoices);
    let pb = progress_bar(files.len())?;

    let mut consolidated = InvoiceTable::new("consolidated");
    let mut unrecognized = Vec::new();
    let mut failed = Vec::new();

    for path in &files {
        let doc = match load_document(path) {
            Ok(doc) => doc,
            Err(e) => {
                if args.continue_on_error {
                    warn!("Failed to process {}: {}", path.display(), e);
                    failed.push((path.clone(), e.to_string()));
                    pb.inc(1);
                    continue;
                }
                error!("Failed to process {}: {}", path.display(), e);
                anyhow::bail!("Processing failed: {}: {}", path.display(), e);
            }
        };

        let outcome = chain.parse(&doc);

        match (outcome.table, outcome.winner) {
            (Some(table), Some(winner)) => {
                for row in table.rows {
                    consolidated.push(tag_line(&doc.source, winner, row));
                }
            }
            _ => unrecognized.push(path.clone()),
        }

        pb.inc(1);
    }

    pb.finish_and_clear();

    let content = match args.format {
        OutputFormat::Csv => to_csv(
            &consolidated.columns,
            consolidated.rows.iter().map(|row| {
                consolidated
                    .columns
                    .iter()
                    .map(|column| row.get(column).map(CellValue::to_string).unwrap_or_default())
            }),
        )?,
        OutputFormat::Json => serde_json::to_string_pretty(&consolidated.rows)?,
    };
    write_output(args.output.as_deref(), &content)?;

    eprintln!(
        "{} Extracted {} invoice lines from {} files in {:?}",
        style("✓").green(),
        consolidated.len(),
        files.len(),
        start.elapsed()
    );

    for path in &unrecognized {
        eprintln!(
            "  {} {}: no invoice layout recognized",
            style("ℹ").blue(),
            path.display()
        );
    }

    if !failed.is_empty() {
        eprintln!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            eprintln!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

pub(super) fn load_document(path: &Path) -> anyhow::Result<InvoiceDocument> {
    let content = fs::read_to_string(path)?;
    let mut doc: InvoiceDocument = serde_json::from_str(&content)?;
    if doc.source.trim().is_empty() {
        doc.source = source_name(path);
    }
    Ok(doc)
}

/// Prefix a line with its source file and the parser that produced it.
fn tag_line(source: &str, parser: &str, line: InvoiceLine) -> InvoiceLine {
    let mut tagged = InvoiceLine::new();
    tagged.insert("Archivo".to_string(), CellValue::from(source));
    tagged.insert("Parser".to_string(), CellValue::from(parser));
    tagged.extend(line);
    tagged
}
