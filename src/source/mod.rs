//! Record sources: where interaction documents come from.
//!
//! Two export layouts are supported:
//! - [`JsonSource`] - one JSON document per file; a top-level array yields
//!   each element as a record (`mongoexport --jsonArray`)
//! - [`JsonlSource`] - one JSON document per line, streamed with bounded
//!   memory (plain `mongoexport`)
//!
//! Both produce a [`RecordIterator`], an iterator of records with progress
//! tracking.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> turnpack::Result<()> {
//! use turnpack::config::SourceConfig;
//! use turnpack::source::open_records;
//!
//! let records = open_records("interaccions.jsonl", None, SourceConfig::default())?;
//! for record in records {
//!     let record = record?;
//!     println!("{}", record["_id"]);
//! }
//! # Ok(())
//! # }
//! ```

mod json;
mod jsonl;

pub use json::{JsonRecordIterator, JsonSource};
pub use jsonl::{JsonlRecordIterator, JsonlSource};

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::SourceConfig;
use crate::error::Result;

/// Layout of an input export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// A single JSON document, usually an array of records.
    Json,
    /// One JSON record per line.
    Jsonl,
}

impl InputFormat {
    /// Returns all supported format names.
    pub fn all_names() -> &'static [&'static str] {
        &["json", "jsonl", "ndjson"]
    }

    /// Detects the layout from the file extension alone.
    ///
    /// ```rust
    /// use turnpack::source::InputFormat;
    ///
    /// assert_eq!(InputFormat::from_extension("dump.ndjson"), Some(InputFormat::Jsonl));
    /// assert_eq!(InputFormat::from_extension("dump.JSON"), Some(InputFormat::Json));
    /// assert_eq!(InputFormat::from_extension("dump.txt"), None);
    /// ```
    pub fn from_extension(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "json" => Some(InputFormat::Json),
            "jsonl" | "ndjson" => Some(InputFormat::Jsonl),
            _ => None,
        }
    }

    /// Detects the layout from the extension, then from the content.
    ///
    /// A file whose first non-blank line is a complete JSON object is
    /// JSON Lines; anything else (including a leading `[`) is JSON.
    ///
    /// # Errors
    ///
    /// Returns [`TurnpackError::Io`](crate::TurnpackError::Io) if the file cannot be read.
    pub fn detect(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(format) = Self::from_extension(path) {
            return Ok(format);
        }

        let mut reader = BufReader::new(File::open(path)?);
        let mut line = String::new();
        while reader.read_line(&mut line)? > 0 {
            let trimmed = line.trim();
            if !trimmed.is_empty() {
                return Ok(Self::sniff(trimmed));
            }
            line.clear();
        }
        Ok(InputFormat::Json)
    }

    fn sniff(first_line: &str) -> Self {
        if first_line.starts_with('{')
            && serde_json::from_str::<Value>(first_line).is_ok_and(|v| v.is_object())
        {
            InputFormat::Jsonl
        } else {
            InputFormat::Json
        }
    }
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Json => write!(f, "JSON"),
            InputFormat::Jsonl => write!(f, "JSONL"),
        }
    }
}

impl std::str::FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "jsonl" | "ndjson" => Ok(InputFormat::Jsonl),
            _ => Err(format!(
                "Unknown input format: '{}'. Expected one of: {}",
                s,
                InputFormat::all_names().join(", ")
            )),
        }
    }
}

/// Iterator over records with progress tracking.
///
/// Object-safe, so sources can hand out `Box<dyn RecordIterator>`.
pub trait RecordIterator: Iterator<Item = Result<Value>> + Send {
    /// Approximate progress as a percentage (0.0 to 100.0), if known.
    fn progress(&self) -> Option<f64> {
        let total = self.total_bytes()?;
        if total == 0 {
            return None;
        }
        Some((self.bytes_processed() as f64 / total as f64) * 100.0)
    }

    /// Bytes consumed so far.
    fn bytes_processed(&self) -> u64;

    /// Total input size in bytes, if known.
    fn total_bytes(&self) -> Option<u64> {
        None
    }
}

/// A source that opens an export file and yields its records.
pub trait RecordSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &'static str;

    /// Opens `path` and returns an iterator over its records.
    ///
    /// # Errors
    ///
    /// Returns [`TurnpackError::Io`](crate::TurnpackError::Io) if the file cannot be opened, or a
    /// parse error for whole-document sources.
    fn records(&self, path: &str) -> Result<Box<dyn RecordIterator>>;
}

/// Creates the source for `format`.
pub fn create_source(format: InputFormat, config: SourceConfig) -> Box<dyn RecordSource> {
    match format {
        InputFormat::Json => Box::new(JsonSource::with_config(config)),
        InputFormat::Jsonl => Box::new(JsonlSource::with_config(config)),
    }
}

/// Opens `path` with the given layout, detecting it when `format` is `None`.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or detected.
pub fn open_records(
    path: &str,
    format: Option<InputFormat>,
    config: SourceConfig,
) -> Result<Box<dyn RecordIterator>> {
    let format = match format {
        Some(format) => format,
        None => InputFormat::detect(path)?,
    };
    create_source(format, config).records(path)
}

/// Reads every record of `path` into memory.
///
/// # Errors
///
/// Returns the first read or parse error.
pub fn read_all(path: &str, format: Option<InputFormat>, config: SourceConfig) -> Result<Vec<Value>> {
    open_records(path, format, config)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::str::FromStr;
    use tempfile::NamedTempFile;

    fn temp_with(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_input_format_from_str() {
        assert_eq!(InputFormat::from_str("JSON").unwrap(), InputFormat::Json);
        assert_eq!(InputFormat::from_str("ndjson").unwrap(), InputFormat::Jsonl);
        assert!(InputFormat::from_str("bson").is_err());
    }

    #[test]
    fn test_detect_by_extension() {
        let file = temp_with(".jsonl", "[1, 2]");
        assert_eq!(InputFormat::detect(file.path()).unwrap(), InputFormat::Jsonl);
    }

    #[test]
    fn test_detect_by_content() {
        let lines = temp_with(".txt", "\n{\"_id\": 1}\n{\"_id\": 2}\n");
        assert_eq!(InputFormat::detect(lines.path()).unwrap(), InputFormat::Jsonl);

        let array = temp_with(".txt", "[{\"_id\": 1}]");
        assert_eq!(InputFormat::detect(array.path()).unwrap(), InputFormat::Json);

        let pretty = temp_with(".dump", "{\n  \"_id\": 1\n}\n");
        assert_eq!(InputFormat::detect(pretty.path()).unwrap(), InputFormat::Json);
    }

    #[test]
    fn test_detect_missing_file() {
        assert!(InputFormat::detect("/nonexistent/file.dump").unwrap_err().is_io());
    }

    #[test]
    fn test_create_source_names() {
        assert_eq!(create_source(InputFormat::Json, SourceConfig::default()).name(), "JSON");
        assert_eq!(
            create_source(InputFormat::Jsonl, SourceConfig::default()).name(),
            "JSON Lines"
        );
    }

    #[test]
    fn test_read_all_autodetects() {
        let file = temp_with(".export", "{\"_id\": 1}\n{\"_id\": 2}\n");
        let path = file.path().to_str().unwrap();
        let records = read_all(path, None, SourceConfig::default()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["_id"], 2);
    }
}
