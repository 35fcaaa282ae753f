//! Output format writers for the wide table.
//!
//! - [`write_csv`] / [`to_csv`] - delimited text, one row per interaction - requires `csv-output` feature
//! - [`write_json`] / [`to_json`] - JSON array of row objects - requires `json-output` feature
//! - [`write_jsonl`] / [`to_jsonl`] - one row object per line - requires `json-output` feature
//! - [`write_xlsx`] / [`to_xlsx_bytes`] - Excel workbook with a frozen header - requires `xlsx-output` feature
//!
//! # Choosing a Format
//!
//! | Format | Use Case |
//! |--------|----------|
//! | XLSX | Manual review in Excel or LibreOffice |
//! | CSV | Spreadsheets, scripts |
//! | JSON | APIs, notebooks |
//! | JSONL | Dataframe loaders, streaming consumers |
//!
//! # Example
//!
//! ```rust,no_run
//! # #[cfg(all(feature = "csv-output", feature = "json-output"))]
//! # fn main() -> turnpack::Result<()> {
//! use serde_json::json;
//! use turnpack::config::ExportConfig;
//! use turnpack::core::models::OutputConfig;
//! use turnpack::core::output::{to_csv, write_csv, write_json, write_jsonl};
//! use turnpack::core::report::Report;
//!
//! let report = Report::build(
//!     vec![json!({"input": "2+2?", "output": "4"})],
//!     &ExportConfig::default(),
//! )?;
//! let config = OutputConfig::new();
//!
//! write_csv(&report, "tabla.csv", &config)?;
//! write_json(&report, "tabla.json", &config.with_pretty())?;
//! write_jsonl(&report, "tabla.jsonl")?;
//!
//! let csv_string = to_csv(&report, &config)?;
//! # Ok(())
//! # }
//! # #[cfg(not(all(feature = "csv-output", feature = "json-output")))]
//! # fn main() {}
//! ```

#[cfg(feature = "csv-output")]
mod csv_writer;
#[cfg(feature = "json-output")]
mod json_writer;
#[cfg(feature = "json-output")]
mod jsonl_writer;
#[cfg(feature = "xlsx-output")]
mod xlsx_writer;

#[cfg(feature = "csv-output")]
pub use csv_writer::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use json_writer::{to_json, write_json};
#[cfg(feature = "json-output")]
pub use jsonl_writer::{to_jsonl, write_jsonl};
#[cfg(feature = "xlsx-output")]
pub use xlsx_writer::{SHEET_NAME, to_xlsx_bytes, write_xlsx};
