//! # turnpack
//!
//! Rebuilds user/assistant dialogue turns from loosely structured
//! interaction records and flattens them into a wide table.
//!
//! ## Overview
//!
//! Interaction documents written by tutoring and chat backends rarely agree
//! on a schema. The transcript may sit under `messages`, `chat`, `history`
//! or some nested key; speakers may be called `role`, `sender` or `author`;
//! timestamps may be Extended-JSON dates, epoch seconds or free text.
//! turnpack handles all of that in three stages:
//!
//! 1. **Locate** ([`core::locator`]) - depth-first search for the message list
//! 2. **Normalize** ([`core::normalizer`]) - ordered alias lookups into a [`NormalizedMessage`]
//! 3. **Pack** ([`core::packer`]) - drop system prompts, compact runs, pair turns
//!
//! A [`Report`](core::Report) then pivots all records into one row each,
//! with `U1, A1 ... Un, An` columns sized to the longest interaction.
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use turnpack::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let records = vec![json!({
//!         "_id": {"$oid": "65a1f0c2e4b0a1b2c3d4e5f6"},
//!         "data": {"chat": [
//!             {"role": "user", "content": "hola"},
//!             {"role": "assistant", "content": "hola, ¿en qué ayudo?"},
//!             {"role": "user", "content": "gracias"}
//!         ]}
//!     })];
//!
//!     let report = Report::build(records, &ExportConfig::default())?;
//!     let csv = to_csv(&report, &OutputConfig::new())?;
//!
//!     assert!(csv.contains("hola;hola, ¿en qué ayudo?;gracias;"));
//!     Ok(())
//! }
//! ```
//!
//! ## Reading Exports
//!
//! ```rust,no_run
//! use turnpack::prelude::*;
//!
//! let records = open_records("interaccions.jsonl", None, SourceConfig::default())?;
//! let filter = RecordFilter::new().with_field("createdAt").with_date_from("2024-01-01")?;
//! let report = Report::try_build(records, &filter, &ExportConfig::default())?;
//! write_to_format(&report, "tabla.csv", OutputFormat::Csv, &OutputConfig::new())?;
//! # Ok::<(), turnpack::TurnpackError>(())
//! ```
//!
//! ## Module Structure
//!
//! - [`core`] - the export engine
//!   - [`core::locator`], [`core::normalizer`], [`core::packer`] - per-record stages
//!   - [`core::processor`] - metadata, flat-field fallback, turn cap
//!   - [`core::filter`] - [`RecordFilter`](core::RecordFilter)
//!   - [`core::report`] - [`Report`](core::Report), [`ReportStats`](core::ReportStats)
//!   - [`core::output`] - CSV, JSON, JSONL and XLSX writers
//! - [`source`] - JSON and JSON Lines record sources
//! - [`parsing`] - alias tables and the timestamp interpreter
//! - [`config`] - library configuration types
//! - [`format`] - [`OutputFormat`](format::OutputFormat) and writer dispatch
//! - [`cli`] - CLI arguments (requires `cli` feature)
//! - [`error`] - [`TurnpackError`], [`Result`]
//! - [`prelude`] - convenient re-exports
//!
//! ## Feature Flags
//!
//! | Feature | Description | Dependencies |
//! |---------|-------------|--------------|
//! | `csv-output` | CSV writer | `csv` |
//! | `json-output` | JSON and JSONL writers | - |
//! | `xlsx-output` | Excel workbook writer | `rust_xlsxwriter` |
//! | `cli` | Command-line interface | `clap`, `tracing-subscriber` |
//! | `full` | All of the above (default) | - |

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod format;
pub mod message;
pub mod parsing;
pub mod source;

// Re-export the main types at the crate root for convenience
pub use error::{Result, TurnpackError};
pub use message::{NormalizedMessage, RoleKind};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use turnpack::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{NormalizedMessage, RoleKind};

    pub use crate::error::{Result, TurnpackError};

    pub use crate::config::{ExportConfig, LocatorConfig, SourceConfig};

    pub use crate::core::{
        Interaction, InteractionMeta, META_COLUMNS, OutputConfig, RecordFilter, Report,
        ReportStats, Turn, locate, normalize, pack, process_record,
    };

    #[cfg(feature = "csv-output")]
    pub use crate::core::output::{to_csv, write_csv};
    #[cfg(feature = "json-output")]
    pub use crate::core::output::{to_json, to_jsonl, write_json, write_jsonl};
    #[cfg(feature = "xlsx-output")]
    pub use crate::core::output::{to_xlsx_bytes, write_xlsx};

    pub use crate::format::{OutputFormat, to_format_string, write_to_format};

    pub use crate::source::{InputFormat, RecordIterator, RecordSource, open_records};
}
