//! CLI subcommands and the helpers they share.

pub mod compare;
pub mod config;
pub mod invoices;
pub mod products;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use aduana_core::models::config::AduanaConfig;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// CSV output
    Csv,
    /// JSON output
    Json,
}

/// Load the configuration file given with `--config`, or the defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<AduanaConfig> {
    match config_path {
        Some(path) => Ok(AduanaConfig::from_file(Path::new(path))?),
        None => Ok(AduanaConfig::default()),
    }
}

/// Expand a glob pattern, keeping files with one of the given extensions.
pub fn expand_inputs(pattern: &str, extensions: &[&str]) -> anyhow::Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            extensions.contains(&ext.to_lowercase().as_str())
        })
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }
    Ok(files)
}

/// File name used in the `Archivo` column.
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_string()
}

pub fn progress_bar(len: usize) -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(len as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );
    Ok(pb)
}

/// Build CSV text from a header and rows.
pub fn to_csv<I, R, S>(columns: &[String], rows: I) -> anyhow::Result<String>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator<Item = S>,
    S: AsRef<[u8]>,
{
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(columns)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Write to the output file, or stdout when none is given.
pub fn write_output(output: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, content)?;
            debug!("Wrote output to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
