use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Infer column types and clean loosely-typed tabular data",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Detect, fill, and coerce every column, then write the cleaned table
    Clean(CleanArgs),
    /// Detect each column's type and emit it as a reusable type mapping
    Probe(ProbeArgs),
}

#[derive(Debug, Args)]
pub struct CleanArgs {
    /// Input CSV file to clean ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Explicit column types such as `price:float,id:int` (repeatable)
    #[arg(short = 't', long = "type", action = clap::ArgAction::Append)]
    pub types: Vec<String>,
    /// YAML or JSON type mapping, e.g. the output of `probe`
    #[arg(long = "types")]
    pub types_file: Option<PathBuf>,
    /// Leave column names exactly as they appear in the input
    #[arg(long = "keep-headers")]
    pub keep_headers: bool,
    /// Treat placeholder tokens like NA or null as literal text
    #[arg(long = "keep-placeholders")]
    pub keep_placeholders: bool,
    /// CSV delimiter character for reading input
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Delimiter to use for output (defaults to input delimiter)
    #[arg(long = "output-delimiter", value_parser = parse_delimiter)]
    pub output_delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Character encoding for the output file/stdout (defaults to utf-8)
    #[arg(long = "output-encoding")]
    pub output_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ProbeArgs {
    /// Input CSV file to inspect ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination mapping file (.yml, .yaml or .json); stdout if omitted
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// Format used when writing to stdout
    #[arg(long, default_value = "yaml")]
    pub format: MappingFormat,
    /// Treat placeholder tokens like NA or null as literal text
    #[arg(long = "keep-placeholders")]
    pub keep_placeholders: bool,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
#[value(rename_all = "kebab-case")]
pub enum MappingFormat {
    #[default]
    Yaml,
    Json,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
