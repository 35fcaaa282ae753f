//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`OutputFormat`] - Output format options
//! - [`InputFormatArg`] - Input layout, or automatic detection
//!
//! Every option can also be set through the environment (`OUTPUT_PATH`,
//! `MAX_TURNOS`, `DATE_FIELD`, `START_DATE`, `END_DATE`, ...), so the tool
//! drops into scheduled jobs without a wrapper script.
//!
//! ```rust
//! use clap::Parser;
//! use turnpack::cli::{Args, OutputFormat};
//!
//! let args = Args::try_parse_from(["turnpack", "dump.jsonl", "-f", "json"]).unwrap();
//! assert_eq!(args.format, OutputFormat::Json);
//! assert_eq!(args.export_config().max_turns, 40);
//! ```

use chrono::{DateTime, Local};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_MAX_TURNS, ExportConfig, LocatorConfig, MAX_DEPTH, SourceConfig};
use crate::core::filter::RecordFilter;
use crate::core::models::OutputConfig;
use crate::error::Result;
use crate::source::InputFormat;

/// Prefix of the default output file name.
pub const DEFAULT_OUTPUT_STEM: &str = "interacciones_tabla";

/// Rebuild user/assistant turns from interaction exports and flatten them
/// into a wide table (U1/A1 ... Un/An).
#[derive(Parser, Debug, Clone)]
#[command(name = "turnpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    turnpack interaccions.jsonl
    turnpack dump.json -o tabla.csv --max-turns 20
    turnpack dump.jsonl -f xlsx -o tabla.xlsx
    turnpack dump.jsonl -f jsonl --date-field createdAt --start-date 2024-01-01
    DATE_FIELD=inicio END_DATE=2024-06-30 turnpack dump.jsonl")]
pub struct Args {
    /// Path to the exported records (JSON array or JSON Lines)
    pub input: String,

    /// Path to output file [default: interacciones_tabla_<timestamp>.<ext>]
    #[arg(short, long, env = "OUTPUT_PATH")]
    pub output: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, env = "OUTPUT_FORMAT", default_value = "csv")]
    pub format: OutputFormat,

    /// Input layout
    #[arg(long, value_enum, env = "INPUT_FORMAT", default_value = "auto")]
    pub input_format: InputFormatArg,

    /// Keep at most this many turns per interaction
    #[arg(long, env = "MAX_TURNOS", default_value_t = DEFAULT_MAX_TURNS)]
    pub max_turns: usize,

    /// Record field used by the date filter (dotted paths allowed)
    #[arg(long, env = "DATE_FIELD", value_name = "FIELD")]
    pub date_field: Option<String>,

    /// Keep records on or after this date
    #[arg(long, env = "START_DATE", value_name = "DATE")]
    pub start_date: Option<String>,

    /// Keep records on or before this date
    #[arg(long, env = "END_DATE", value_name = "DATE")]
    pub end_date: Option<String>,

    /// CSV field delimiter
    #[arg(long, default_value = ";", value_parser = parse_delimiter)]
    pub delimiter: u8,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,

    /// Maximum nesting depth searched for the message list
    #[arg(long, default_value_t = MAX_DEPTH)]
    pub max_depth: usize,

    /// Fail on malformed input lines instead of skipping them
    #[arg(long)]
    pub strict: bool,
}

impl Args {
    /// Output path: the explicit one, or a timestamped default.
    pub fn output_path(&self) -> String {
        self.output_path_at(Local::now())
    }

    /// Output path, using `now` for the default name.
    pub fn output_path_at(&self, now: DateTime<Local>) -> String {
        match self.output.as_deref().map(str::trim) {
            Some(path) if !path.is_empty() => path.to_string(),
            _ => format!(
                "{DEFAULT_OUTPUT_STEM}_{}.{}",
                now.format("%Y%m%d_%H%M%S"),
                self.format.extension()
            ),
        }
    }

    /// Input layout, `None` for automatic detection.
    pub fn input_format(&self) -> Option<InputFormat> {
        self.input_format.into()
    }

    pub fn export_config(&self) -> ExportConfig {
        ExportConfig::new()
            .with_max_turns(self.max_turns)
            .with_locator(LocatorConfig::new().with_max_depth(self.max_depth))
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig::new().with_skip_invalid(!self.strict)
    }

    pub fn output_config(&self) -> OutputConfig {
        let config = OutputConfig::new().with_delimiter(self.delimiter);
        if self.pretty {
            config.with_pretty()
        } else {
            config
        }
    }

    /// Builds the record filter. Blank values count as unset.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidDate`](crate::TurnpackError::InvalidDate) for an unreadable bound.
    pub fn record_filter(&self) -> Result<RecordFilter> {
        let mut filter = RecordFilter::new();
        if let Some(field) = non_blank(self.date_field.as_deref()) {
            filter = filter.with_field(field);
        }
        if let Some(start) = non_blank(self.start_date.as_deref()) {
            filter = filter.with_date_from(start)?;
        }
        if let Some(end) = non_blank(self.end_date.as_deref()) {
            filter = filter.with_date_to(end)?;
        }
        Ok(filter)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_delimiter(s: &str) -> std::result::Result<u8, String> {
    match s.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(format!("delimiter must be a single ASCII character, got '{s}'")),
    }
}

/// Input layout option, with automatic detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormatArg {
    /// Detect from the extension, then the content
    #[default]
    Auto,

    /// A single JSON document or array
    Json,

    /// One JSON record per line
    #[value(alias = "ndjson")]
    Jsonl,
}

impl From<InputFormatArg> for Option<InputFormat> {
    fn from(arg: InputFormatArg) -> Self {
        match arg {
            InputFormatArg::Auto => None,
            InputFormatArg::Json => Some(InputFormat::Json),
            InputFormatArg::Jsonl => Some(InputFormat::Jsonl),
        }
    }
}

/// Output format options.
///
/// - [`Csv`](OutputFormat::Csv) - delimited text, opens in any spreadsheet
/// - [`Json`](OutputFormat::Json) - array of row objects
/// - [`Jsonl`](OutputFormat::Jsonl) - one row object per line
/// - [`Xlsx`](OutputFormat::Xlsx) - Excel workbook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// CSV with semicolon delimiter
    #[default]
    Csv,

    /// JSON array of rows
    Json,

    /// JSON Lines, one row per line
    #[value(alias = "ndjson")]
    Jsonl,

    /// Excel workbook, sheet Tabla_Conversacion
    Xlsx,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    pub fn extension(&self) -> &'static str {
        crate::format::OutputFormat::from(*self).extension()
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", crate::format::OutputFormat::from(*self))
    }
}

// Conversion to library format type
impl From<OutputFormat> for crate::format::OutputFormat {
    fn from(format: OutputFormat) -> crate::format::OutputFormat {
        match format {
            OutputFormat::Csv => crate::format::OutputFormat::Csv,
            OutputFormat::Json => crate::format::OutputFormat::Json,
            OutputFormat::Jsonl => crate::format::OutputFormat::Jsonl,
            OutputFormat::Xlsx => crate::format::OutputFormat::Xlsx,
        }
    }
}
