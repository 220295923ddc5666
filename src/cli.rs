use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::{fields::CanonicalField, io_utils::MAX_FILE_BYTES};

#[derive(Debug, Parser)]
#[command(author, version, about = "Import leads from CSV and Excel files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show detected columns, their mapping, and validation statistics
    Inspect(InspectArgs),
    /// Preview the first rows as normalized leads
    Preview(PreviewArgs),
    /// Assemble the import payload and write its JSON part
    Export(ExportArgs),
}

#[derive(Debug, Args)]
pub struct SourceArgs {
    /// Input file (.csv, .xlsx or .xls)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Character encoding of CSV input (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Maximum accepted file size in bytes
    #[arg(long = "max-bytes", default_value_t = MAX_FILE_BYTES)]
    pub max_bytes: u64,
    /// Mapping overrides of the form `Column=field`; `Column=` unmaps it
    #[arg(long = "map", value_parser = parse_assignment, action = clap::ArgAction::Append)]
    pub overrides: Vec<(String, Option<CanonicalField>)>,
    /// Saved mapping profile applied before `--map` overrides
    #[arg(long = "profile")]
    pub profile: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct InspectArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Write the effective mapping to a profile file
    #[arg(long = "save-profile")]
    pub save_profile: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// Number of rows to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,
    /// YAML or JSON file with the import metadata
    #[arg(short, long)]
    pub meta: PathBuf,
    /// Output JSON file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

pub fn parse_assignment(value: &str) -> Result<(String, Option<CanonicalField>), String> {
    let (column, field) = value
        .rsplit_once('=')
        .ok_or_else(|| format!("Expected `Column=field`, got '{value}'"))?;
    let column = column.trim();
    if column.is_empty() {
        return Err("Column name cannot be empty".to_string());
    }
    let field = match field.trim() {
        "" => None,
        other => Some(other.parse::<CanonicalField>()?),
    };
    Ok((column.to_string(), field))
}
