//! Loading delimited files into a [`Table`] and writing cleaned tables back out.
//!
//! - **Delimiters**: `.tsv` paths default to tab, everything else to comma;
//!   an explicit delimiter always wins.
//! - **Encoding**: input is decoded and output transcoded via `encoding_rs`,
//!   defaulting to UTF-8.
//! - **stdin/stdout**: the `-` path convention routes through standard streams.
//! - **Missing cells**: empty fields and common placeholder tokens (`NA`,
//!   `N/A`, `null`, `NaN`, ...) load as missing.

use std::{
    fs::File,
    io::{BufReader, Read, Write},
    path::Path,
};

use anyhow::{Context, Result, anyhow, bail};
use csv::QuoteStyle;
use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::{
    data::{Cell, Value},
    table::Table,
};

pub const DEFAULT_CSV_DELIMITER: u8 = b',';
pub const DEFAULT_TSV_DELIMITER: u8 = b'\t';

const PLACEHOLDER_TOKENS: &[&str] = &[
    "na", "n/a", "#n/a", "#na", "<na>", "null", "nan", "-nan", "none",
];

#[derive(Debug, Clone)]
pub struct ReadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    /// Load placeholder tokens such as `NA` as literal text instead of missing.
    pub keep_placeholders: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
            keep_placeholders: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WriteOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
        }
    }
}

pub fn is_dash(path: &Path) -> bool {
    path == Path::new("-")
}

pub fn resolve_encoding(label: Option<&str>) -> Result<&'static Encoding> {
    if let Some(value) = label {
        Encoding::for_label(value.trim().as_bytes())
            .ok_or_else(|| anyhow!("Unknown encoding '{value}'"))
    } else {
        Ok(UTF_8)
    }
}

pub fn resolve_input_delimiter(path: &Path, provided: Option<u8>) -> u8 {
    provided.unwrap_or_else(|| match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => DEFAULT_TSV_DELIMITER,
        _ => DEFAULT_CSV_DELIMITER,
    })
}

pub fn resolve_output_delimiter(path: Option<&Path>, provided: Option<u8>, fallback: u8) -> u8 {
    if let Some(delim) = provided {
        return delim;
    }
    if let Some(path) = path {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => return DEFAULT_TSV_DELIMITER,
            Some(ext) if ext.eq_ignore_ascii_case("csv") => return DEFAULT_CSV_DELIMITER,
            _ => {}
        }
    }
    fallback
}

pub fn is_placeholder(value: &str) -> bool {
    let lowered = value.trim().to_ascii_lowercase();
    PLACEHOLDER_TOKENS.contains(&lowered.as_str())
}

fn decode_field(field: &[u8], encoding: &'static Encoding) -> Result<String> {
    let (text, _, had_errors) = encoding.decode(field);
    if had_errors {
        bail!("Failed to decode text with encoding {}", encoding.name());
    }
    Ok(text.into_owned())
}

fn to_cell(field: String, keep_placeholders: bool) -> Cell {
    if field.trim().is_empty() || (!keep_placeholders && is_placeholder(&field)) {
        None
    } else {
        Some(Value::String(field))
    }
}

pub fn read_table(path: &Path, options: &ReadOptions) -> Result<Table> {
    let delimiter = resolve_input_delimiter(path, options.delimiter);
    let source: Box<dyn Read> = if is_dash(path) {
        Box::new(std::io::stdin().lock())
    } else {
        Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Opening input file {path:?}"))?,
        ))
    };
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .double_quote(true)
        .flexible(false)
        .from_reader(source);

    let headers = reader
        .byte_headers()
        .context("Reading header row")?
        .iter()
        .map(|field| decode_field(field, options.encoding))
        .collect::<Result<Vec<_>>>()?;

    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let row = record
            .iter()
            .map(|field| {
                decode_field(field, options.encoding)
                    .map(|text| to_cell(text, options.keep_placeholders))
            })
            .collect::<Result<Vec<_>>>()
            .with_context(|| format!("Decoding row {}", idx + 2))?;
        rows.push(row);
    }
    debug!(
        "Read {} row(s) and {} column(s) from {path:?}",
        rows.len(),
        headers.len()
    );

    Table::from_rows(&headers, rows).with_context(|| format!("Assembling table from {path:?}"))
}

/// Writes `table` to `path`, or stdout when `path` is `None` or `-`.
pub fn write_table(table: &Table, path: Option<&Path>, options: &WriteOptions) -> Result<()> {
    let delimiter = resolve_output_delimiter(path, options.delimiter, DEFAULT_CSV_DELIMITER);
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .quote_style(QuoteStyle::Necessary)
        .double_quote(true)
        .from_writer(Vec::new());
    writer
        .write_record(table.headers())
        .context("Writing output headers")?;
    for (idx, row) in table.text_rows().enumerate() {
        writer
            .write_record(&row)
            .with_context(|| format!("Writing output row {}", idx + 2))?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|err| anyhow!("Flushing output buffer: {}", err.error()))?;

    let bytes = if options.encoding == UTF_8 {
        buffer
    } else {
        let text = String::from_utf8(buffer).context("Output buffer is not valid UTF-8")?;
        let (encoded, _, had_errors) = options.encoding.encode(&text);
        if had_errors {
            bail!("Failed to encode output using {}", options.encoding.name());
        }
        encoded.into_owned()
    };

    let mut sink: Box<dyn Write> = match path {
        Some(p) if !is_dash(p) => {
            Box::new(File::create(p).with_context(|| format!("Creating output file {p:?}"))?)
        }
        _ => Box::new(std::io::stdout().lock()),
    };
    sink.write_all(&bytes).context("Writing output")?;
    sink.flush().context("Flushing output")
}
