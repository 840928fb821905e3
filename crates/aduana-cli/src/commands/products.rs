//! Products command - extract product records from declaration text files.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{error, warn};

use aduana_core::declaration::{DeclarationTable, ProductExtractor, ProductTable};
use aduana_core::models::record::ProductRecord;

use super::{OutputFormat, expand_inputs, load_config, progress_bar, source_name, to_csv, write_output};

/// Arguments for the products command.
#[derive(Args)]
pub struct ProductsArgs {
    /// Input text files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// CSV file whose first row is the declaration header template
    #[arg(long)]
    template: Option<PathBuf>,

    /// Write declaration rows filled against the template to this file
    #[arg(long)]
    declarations_output: Option<PathBuf>,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

pub fn run(args: ProductsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let template_path = args.template.clone().or_else(|| config.output.template.clone());
    if args.declarations_output.is_some() && template_path.is_none() {
        anyhow::bail!("--declarations-output requires a header template (--template)");
    }
    let headers = template_path.as_deref().map(read_template).transpose()?;

    let files = expand_inputs(&args.input, &["txt"])?;
    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let extractor = ProductExtractor::from_config(&config.declarations);
    let pb = progress_bar(files.len())?;

    let mut records: Vec<ProductRecord> = Vec::new();
    let mut declarations = DeclarationTable::default();
    let mut empty_files = Vec::new();
    let mut failed = Vec::new();
    let mut dropped = 0;

    for path in &files {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                if args.continue_on_error {
                    warn!("Failed to read {}: {}", path.display(), e);
                    failed.push((path.clone(), e.to_string()));
                    pb.inc(1);
                    continue;
                }
                error!("Failed to read {}: {}", path.display(), e);
                anyhow::bail!("Processing failed: {}: {}", path.display(), e);
            }
        };

        let source = source_name(path);
        let extraction = extractor.extract(&text, &source);

        if let Some(headers) = &headers {
            declarations.extend(DeclarationTable::from_blocks(&extraction.declarations, headers));
        }
        if extraction.records.is_empty() {
            empty_files.push(path.clone());
        }

        dropped += extraction.dropped_blocks;
        records.extend(extraction.records);
        pb.inc(1);
    }

    pb.finish_and_clear();

    let table = ProductTable::from_records(&records, config.output.drop_empty_columns);
    let content = match args.format {
        OutputFormat::Csv => to_csv(&table.columns, &table.rows)?,
        OutputFormat::Json => serde_json::to_string_pretty(&table.row_maps())?,
    };
    write_output(args.output.as_deref(), &content)?;

    if let Some(path) = &args.declarations_output {
        write_declarations(path, &declarations, args.format)?;
        eprintln!(
            "{} {} declaration rows written to {}",
            style("✓").green(),
            declarations.len(),
            path.display()
        );
    }

    eprintln!(
        "{} Extracted {} products from {} files in {:?} ({} blocks without product dropped)",
        style("✓").green(),
        table.len(),
        files.len(),
        start.elapsed(),
        dropped
    );

    for path in &empty_files {
        eprintln!("  {} {}: no products found", style("ℹ").blue(), path.display());
    }

    if !failed.is_empty() {
        eprintln!("{}", style("Failed files:").red());
        for (path, error) in &failed {
            eprintln!("  - {}: {}", path.display(), error);
        }
    }

    Ok(())
}

/// Header names from the first row of a CSV template.
fn read_template(path: &Path) -> anyhow::Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)?;

    let headers = match reader.records().next() {
        Some(record) => record?.iter().map(|h| h.trim().to_string()).collect::<Vec<_>>(),
        None => Vec::new(),
    };

    if headers.is_empty() {
        anyhow::bail!("Template has no header row: {}", path.display());
    }
    Ok(headers)
}

fn write_declarations(
    path: &Path,
    table: &DeclarationTable,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let content = match format {
        OutputFormat::Csv => to_csv(
            &table.columns,
            table
                .rows
                .iter()
                .map(|row| row.iter().map(|cell| cell.clone().unwrap_or_default())),
        )?,
        OutputFormat::Json => serde_json::to_string_pretty(table)?,
    };
    write_output(Some(path), &content)
}
