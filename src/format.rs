//! Output format types for turnpack.
//!
//! These types don't depend on CLI frameworks, so library users can select
//! a writer without pulling in `clap`.
//!
//! # Example
//!
//! ```rust
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn example() -> turnpack::Result<()> {
//! use serde_json::json;
//! use turnpack::config::ExportConfig;
//! use turnpack::core::models::OutputConfig;
//! use turnpack::core::report::Report;
//! use turnpack::format::{OutputFormat, write_to_format};
//!
//! let report = Report::build(vec![json!({"input": "hola"})], &ExportConfig::default())?;
//!
//! // Write using format enum
//! write_to_format(&report, "tabla.csv", OutputFormat::Csv, &OutputConfig::new())?;
//!
//! // Or use format detection from extension
//! let format = OutputFormat::from_path("tabla.jsonl")?;
//! assert_eq!(format, OutputFormat::Jsonl);
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::core::models::OutputConfig;
use crate::core::report::Report;
use crate::error::TurnpackError;

/// Output format for the wide table.
///
/// - [`Csv`](OutputFormat::Csv) - delimited text, opens in any spreadsheet
/// - [`Json`](OutputFormat::Json) - array of row objects
/// - [`Jsonl`](OutputFormat::Jsonl) - one row object per line
/// - [`Xlsx`](OutputFormat::Xlsx) - Excel workbook, one sheet
///
/// # Example
///
/// ```rust
/// use turnpack::format::OutputFormat;
/// use std::str::FromStr;
///
/// let format = OutputFormat::from_str("jsonl").unwrap();
/// assert_eq!(format, OutputFormat::Jsonl);
/// assert_eq!(format.extension(), "jsonl");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum OutputFormat {
    /// CSV with semicolon delimiter (default)
    #[default]
    Csv,

    /// JSON array of row objects
    Json,

    /// JSON Lines, one row object per line. Also known as NDJSON.
    Jsonl,

    /// Excel workbook with a frozen header row and fitted columns
    Xlsx,
}

impl OutputFormat {
    /// Returns the file extension for this format (without dot).
    ///
    /// # Example
    ///
    /// ```rust
    /// use turnpack::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Csv.extension(), "csv");
    /// assert_eq!(OutputFormat::Json.extension(), "json");
    /// assert_eq!(OutputFormat::Jsonl.extension(), "jsonl");
    /// ```
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Xlsx => "xlsx",
        }
    }

    /// Returns `true` if the format renders as text.
    pub fn is_text(&self) -> bool {
        !matches!(self, OutputFormat::Xlsx)
    }

    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["csv", "json", "jsonl", "ndjson", "xlsx"]
    }

    /// Returns all available formats.
    pub fn all() -> &'static [OutputFormat] {
        &[
            OutputFormat::Csv,
            OutputFormat::Json,
            OutputFormat::Jsonl,
            OutputFormat::Xlsx,
        ]
    }

    /// Returns the MIME type for this format.
    ///
    /// # Example
    ///
    /// ```rust
    /// use turnpack::format::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Json.mime_type(), "application/json");
    /// ```
    pub fn mime_type(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "text/csv",
            OutputFormat::Json => "application/json",
            OutputFormat::Jsonl => "application/x-ndjson",
            OutputFormat::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }

    /// Detects format from a file path based on extension.
    ///
    /// # Example
    ///
    /// ```rust
    /// use turnpack::format::OutputFormat;
    ///
    /// let format = OutputFormat::from_path("output.jsonl").unwrap();
    /// assert_eq!(format, OutputFormat::Jsonl);
    /// ```
    pub fn from_path(path: &str) -> Result<Self, TurnpackError> {
        let ext = path.rsplit('.').next().unwrap_or("").to_lowercase();

        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "xlsx" => Ok(OutputFormat::Xlsx),
            _ => Err(TurnpackError::invalid_format(
                "output",
                format!("Unknown file extension: '.{ext}'. Expected one of: csv, json, jsonl, xlsx"),
            )),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Csv => write!(f, "CSV"),
            OutputFormat::Json => write!(f, "JSON"),
            OutputFormat::Jsonl => write!(f, "JSONL"),
            OutputFormat::Xlsx => write!(f, "XLSX"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "jsonl" | "ndjson" => Ok(OutputFormat::Jsonl),
            "xlsx" => Ok(OutputFormat::Xlsx),
            _ => Err(format!(
                "Unknown format: '{}'. Expected one of: {}",
                s,
                OutputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Writes the report to a file in the specified format.
///
/// # Example
///
/// ```rust,no_run
/// # #[cfg(all(feature = "csv-output", feature = "json-output"))]
/// # fn example() -> turnpack::Result<()> {
/// use serde_json::json;
/// use turnpack::config::ExportConfig;
/// use turnpack::core::models::OutputConfig;
/// use turnpack::core::report::Report;
/// use turnpack::format::{OutputFormat, write_to_format};
///
/// let report = Report::build(vec![json!({"input": "hola"})], &ExportConfig::default())?;
/// let config = OutputConfig::new();
///
/// write_to_format(&report, "tabla.csv", OutputFormat::Csv, &config)?;
/// write_to_format(&report, "tabla.json", OutputFormat::Json, &config)?;
/// write_to_format(&report, "tabla.jsonl", OutputFormat::Jsonl, &config)?;
/// # #[cfg(feature = "xlsx-output")]
/// write_to_format(&report, "tabla.xlsx", OutputFormat::Xlsx, &config)?;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
///
/// Returns an error if:
/// - The required feature for the format is not enabled
/// - The file cannot be written
#[allow(unused_variables)]
pub fn write_to_format(
    report: &Report,
    path: &str,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<(), TurnpackError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::write_csv(report, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::write_json(report, path, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::write_jsonl(report, path),
        #[cfg(feature = "xlsx-output")]
        OutputFormat::Xlsx => crate::core::output::write_xlsx(report, path),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

/// Renders the report as a string in the specified format.
///
/// [`Xlsx`](OutputFormat::Xlsx) is binary and returns
/// [`InvalidFormat`](TurnpackError::InvalidFormat); use
/// [`write_to_format`] or `to_xlsx_bytes` instead.
///
/// # Example
///
/// ```rust
/// # #[cfg(all(feature = "csv-output", feature = "json-output"))]
/// # fn example() -> turnpack::Result<()> {
/// use serde_json::json;
/// use turnpack::config::ExportConfig;
/// use turnpack::core::models::OutputConfig;
/// use turnpack::core::report::Report;
/// use turnpack::format::{OutputFormat, to_format_string};
///
/// let report = Report::build(vec![json!({"input": "hola"})], &ExportConfig::default())?;
/// let csv = to_format_string(&report, OutputFormat::Csv, &OutputConfig::new())?;
/// assert!(csv.starts_with("interaccion_id;"));
/// # Ok(())
/// # }
/// ```
#[allow(unused_variables)]
pub fn to_format_string(
    report: &Report,
    format: OutputFormat,
    config: &OutputConfig,
) -> Result<String, TurnpackError> {
    match format {
        #[cfg(feature = "csv-output")]
        OutputFormat::Csv => crate::core::output::to_csv(report, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Json => crate::core::output::to_json(report, config),
        #[cfg(feature = "json-output")]
        OutputFormat::Jsonl => crate::core::output::to_jsonl(report),
        OutputFormat::Xlsx => Err(TurnpackError::invalid_format(
            "output",
            "XLSX is a binary format and cannot be rendered as text",
        )),
        #[allow(unreachable_patterns)]
        _ => Err(missing_feature(format)),
    }
}

#[allow(dead_code)]
fn missing_feature(format: OutputFormat) -> TurnpackError {
    TurnpackError::invalid_format(
        "output",
        format!(
            "Output format {format:?} requires the '{}' feature to be enabled",
            match format {
                OutputFormat::Csv => "csv-output",
                OutputFormat::Json | OutputFormat::Jsonl => "json-output",
                OutputFormat::Xlsx => "xlsx-output",
            }
        ),
    )
}
