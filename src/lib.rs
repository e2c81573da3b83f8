//! Column type inference and coercion for loosely-typed tabular data.
//!
//! A [`Table`] loaded from a spreadsheet export may mix numbers, text, dates
//! and blanks in one column. [`Cleaner`] resolves one [`SemanticType`] per
//! column (an explicit [`TypeMapping`] entry, or [`detect`] otherwise), fills
//! missing cells with a type-appropriate default, and coerces every cell
//! without failing on malformed input.
//!
//! ```
//! use sheet_cleaner::{Cleaner, Column, SemanticType, Table, TypeMapping, Value};
//!
//! let table = Table::new(vec![
//!     Column::new("price", vec![Some(Value::from("3")), None]),
//!     Column::new("sku", vec![Some(Value::from("A-1")), Some(Value::from("B-2"))]),
//! ])
//! .unwrap();
//! let mapping = TypeMapping::new().with("price", SemanticType::Float);
//!
//! let mut cleaner = Cleaner::new(&table, mapping);
//! let cleaned = cleaner.clean().clean_data();
//! assert_eq!(
//!     cleaned.column("price").unwrap().cells,
//!     vec![Some(Value::Float(3.0)), Some(Value::Float(0.0))]
//! );
//! ```

pub mod cleaner;
pub mod cli;
pub mod coerce;
pub mod data;
pub mod detect;
pub mod io_utils;
pub mod schema;
pub mod table;

use std::{env, io, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use itertools::Itertools;
use log::{LevelFilter, info};

pub use crate::cleaner::{CleanOptions, CleanState, Cleaner, ResolvedColumn, TypeSource, clean_table};
pub use crate::coerce::{CoerceError, clean_column};
pub use crate::data::{Cell, Value};
pub use crate::detect::{ColumnProfile, detect, profile};
pub use crate::schema::{MappingError, SemanticType, TypeMapping};
pub use crate::table::{Column, Table, TableError};

use crate::{
    cli::{Cli, Commands, MappingFormat},
    io_utils::{ReadOptions, WriteOptions},
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("sheet_cleaner", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Clean(args) => handle_clean(&args),
        Commands::Probe(args) => handle_probe(&args),
    }
}

fn handle_clean(args: &cli::CleanArgs) -> Result<()> {
    let read_options = ReadOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        keep_placeholders: args.keep_placeholders,
    };
    let input_delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let write_options = WriteOptions {
        delimiter: Some(io_utils::resolve_output_delimiter(
            args.output.as_deref(),
            args.output_delimiter,
            input_delimiter,
        )),
        encoding: io_utils::resolve_encoding(args.output_encoding.as_deref())?,
    };

    let mut mapping = match &args.types_file {
        Some(path) => TypeMapping::load(path)
            .with_context(|| format!("Loading type mapping from {path:?}"))?,
        None => TypeMapping::new(),
    };
    mapping.merge(
        TypeMapping::from_specs(&args.types).context("Parsing --type definitions")?,
    );

    if mapping.is_empty() {
        info!("Cleaning '{}' using detected column types", args.input.display());
    } else {
        info!(
            "Cleaning '{}' with explicit column types {}",
            args.input.display(),
            mapping
                .iter()
                .map(|(name, ty)| format!("{name}:{ty}"))
                .join(", ")
        );
    }
    let table = io_utils::read_table(&args.input, &read_options)
        .with_context(|| format!("Loading {:?}", args.input))?;
    let mut cleaner = Cleaner::new(&table, mapping).with_options(CleanOptions {
        normalize_headers: !args.keep_headers,
    });
    cleaner.clean();
    for column in cleaner.resolved_columns() {
        info!(
            "{} -> {} ({})",
            column.output_name,
            column.semantic_type,
            match column.source {
                TypeSource::Mapping => "mapped",
                TypeSource::Detected => "detected",
            }
        );
    }
    io_utils::write_table(cleaner.clean_data(), args.output.as_deref(), &write_options)
        .context("Writing cleaned table")?;
    Ok(())
}

fn handle_probe(args: &cli::ProbeArgs) -> Result<()> {
    let read_options = ReadOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        keep_placeholders: args.keep_placeholders,
    };
    let table = io_utils::read_table(&args.input, &read_options)
        .with_context(|| format!("Loading {:?}", args.input))?;

    let mut mapping = TypeMapping::new();
    for column in table.columns() {
        let profile = profile(&column.cells);
        let ty = profile.decide();
        info!(
            "{}: {ty} ({} of {} non-missing, sample {:?})",
            column.name,
            profile.non_missing,
            column.len(),
            profile.sample.as_deref().unwrap_or("")
        );
        mapping.insert(column.name.clone(), ty);
    }

    match &args.output {
        Some(path) if !io_utils::is_dash(path) => {
            mapping
                .save(path)
                .with_context(|| format!("Writing type mapping to {path:?}"))?;
            info!(
                "Type mapping for {} column(s) written to {path:?}",
                mapping.len()
            );
        }
        _ => match args.format {
            MappingFormat::Yaml => print!("{}", mapping.to_yaml_string()?),
            MappingFormat::Json => mapping.write_json(io::stdout().lock())?,
        },
    }
    Ok(())
}
