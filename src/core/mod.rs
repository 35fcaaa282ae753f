//! The export engine.
//!
//! This module contains:
//! - [`locator`] - finds the message list inside a record
//! - [`normalizer`] - turns each located message into a [`NormalizedMessage`](crate::NormalizedMessage)
//! - [`packer`] - rebuilds user/assistant turns
//! - [`processor`] - per-record metadata, flat-field fallback and turn cap
//! - [`filter`] - optional date range on records
//! - [`report`] - two-pass pivot into the wide table
//! - [`output`] - format writers (CSV, JSON, JSONL)
//!
//! # Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use turnpack::core::{ExportConfig, Report};
//!
//! # fn main() -> turnpack::Result<()> {
//! let report = Report::build(
//!     vec![json!({"messages": [{"role": "user", "content": "hola"}]})],
//!     &ExportConfig::default(),
//! )?;
//! assert_eq!(report.header().last().map(String::as_str), Some("A1"));
//! # Ok(())
//! # }
//! ```

pub mod filter;
pub mod locator;
pub mod models;
pub mod normalizer;
pub mod output;
pub mod packer;
pub mod processor;
pub mod report;

pub use filter::{RecordFilter, apply_filters};
pub use locator::{Located, locate, locate_with};
pub use models::{Interaction, InteractionMeta, OutputConfig, Turn};
pub use normalizer::{normalize, normalize_all};
pub use packer::pack;
pub use processor::{FALLBACK_PATH, process_record};
pub use report::{META_COLUMNS, Report, ReportStats};

pub use crate::config::ExportConfig;

#[cfg(feature = "csv-output")]
pub use output::{to_csv, write_csv};
#[cfg(feature = "json-output")]
pub use output::{to_json, to_jsonl, write_json, write_jsonl};
#[cfg(feature = "xlsx-output")]
pub use output::{to_xlsx_bytes, write_xlsx};
