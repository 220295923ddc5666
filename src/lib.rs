pub mod classify;
pub mod cli;
pub mod data;
pub mod dates;
pub mod decode;
pub mod error;
pub mod export;
pub mod fields;
pub mod io_utils;
pub mod mapping;
pub mod normalize;
pub mod persist;
pub mod session;
pub mod table;
pub mod validate;

use std::{env, fs, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, info};

use crate::{
    cli::{Cli, Commands, SourceArgs},
    export::ImportMetadata,
    io_utils::{DecodeOptions, SourceFile},
    mapping::ColumnMapping,
    persist::{JsonFileStore, Store},
    session::ImportSession,
    table::TextTable,
};

pub use crate::{
    classify::classify,
    data::{CellValue, Dataset, RawRow},
    dates::parse_date,
    decode::decode,
    error::ImportError,
    export::assemble,
    fields::CanonicalField,
    normalize::project,
    validate::{ValidationStats, validate},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("lead_import", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Inspect(args) => handle_inspect(&args),
        Commands::Preview(args) => handle_preview(&args),
        Commands::Export(args) => handle_export(&args),
    }
}

fn open_session(args: &SourceArgs) -> Result<ImportSession> {
    let options = DecodeOptions {
        max_bytes: args.max_bytes,
        input_encoding: args.input_encoding.clone(),
    };
    let source = SourceFile::open(&args.input, &options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    let mut session = ImportSession::open(source, &options)
        .with_context(|| format!("Decoding {:?}", args.input))?;

    if let Some(path) = &args.profile {
        let store = JsonFileStore::<ColumnMapping>::new(path);
        match store.load()? {
            Some(profile) => {
                let overrides = profile
                    .iter()
                    .filter(|(column, _)| session.dataset().has_column(column))
                    .map(|(column, field)| (column.to_string(), Some(field)))
                    .collect::<Vec<_>>();
                debug!("Applying {} assignment(s) from {path:?}", overrides.len());
                session
                    .apply_overrides(&overrides)
                    .with_context(|| format!("Applying profile {path:?}"))?;
            }
            None => info!("Profile {path:?} does not exist yet; using detected mapping"),
        }
    }
    if !args.overrides.is_empty() {
        session
            .apply_overrides(&args.overrides)
            .context("Applying --map overrides")?;
    }
    Ok(session)
}

fn handle_inspect(args: &cli::InspectArgs) -> Result<()> {
    let session = open_session(&args.source)?;

    let mut columns = TextTable::new(["column", "field", "required"]);
    for column in session.columns() {
        let field = session.mapping().field_for(column);
        columns.push_row(vec![
            column.clone(),
            field.map(|f| f.id().to_string()).unwrap_or_default(),
            field
                .map(|f| if f.required() { "yes" } else { "" })
                .unwrap_or_default()
                .to_string(),
        ]);
    }
    columns.print();
    println!();

    let stats = session.stats();
    let mut summary = TextTable::new(["check", "count"]);
    summary.extend_rows(stats.render_rows());
    summary.print();

    let missing = session.mapping().missing_required();
    if !missing.is_empty() {
        let labels = missing.iter().map(|f| f.label()).collect::<Vec<_>>();
        info!("Required field(s) not mapped yet: {}", labels.join(", "));
    }

    if let Some(path) = &args.save_profile {
        JsonFileStore::<ColumnMapping>::new(path).save(session.mapping())?;
        info!("Saved mapping profile to {path:?}");
    }
    Ok(())
}

fn handle_preview(args: &cli::PreviewArgs) -> Result<()> {
    let session = open_session(&args.source)?;
    let leads = session.preview(args.rows);
    table::leads_table(&leads).print();
    info!(
        "Previewed {} of {} row(s) from {:?}",
        leads.len(),
        session.dataset().row_count(),
        args.source.input
    );
    Ok(())
}

fn handle_export(args: &cli::ExportArgs) -> Result<()> {
    let metadata = ImportMetadata::load(&args.meta)?;
    let session = open_session(&args.source)?;
    let stats = session.stats();
    let payload = session.into_payload(metadata)?;
    let json = payload.data_json().context("Serializing import request")?;

    match &args.output {
        Some(path) => {
            fs::write(path, &json).with_context(|| format!("Writing payload to {path:?}"))?;
            info!("Wrote import request to {path:?}");
        }
        None => println!("{json}"),
    }
    info!(
        "Payload ready: {} valid and {} invalid row(s) in '{}'",
        stats.valid_rows, stats.invalid_rows, payload.file.name
    );
    Ok(())
}
