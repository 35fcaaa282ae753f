//! Whole-document JSON source.

use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use serde_json::Value;

use super::{RecordIterator, RecordSource};
use crate::config::SourceConfig;
use crate::error::{Result, TurnpackError};

/// Reads a file holding one JSON document.
///
/// A top-level array yields each element as a record; any other value is a
/// single record.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSource {
    config: SourceConfig,
}

impl JsonSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SourceConfig) -> Self {
        Self { config }
    }
}

impl RecordSource for JsonSource {
    fn name(&self) -> &'static str {
        "JSON"
    }

    fn records(&self, path: &str) -> Result<Box<dyn RecordIterator>> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let reader = BufReader::with_capacity(self.config.buffer_size, file);

        let document: Value = serde_json::from_reader(reader)
            .map_err(|e| TurnpackError::json_parse(e, Some(PathBuf::from(path))))?;

        Ok(Box::new(JsonRecordIterator::new(document, file_size)))
    }
}

/// Iterator over the records of an already parsed document.
pub struct JsonRecordIterator {
    records: std::vec::IntoIter<Value>,
    file_size: u64,
}

impl JsonRecordIterator {
    /// Splits `document` into records.
    pub fn new(document: Value, file_size: u64) -> Self {
        let records = match document {
            Value::Array(items) => items,
            other => vec![other],
        };
        Self {
            records: records.into_iter(),
            file_size,
        }
    }
}

impl RecordIterator for JsonRecordIterator {
    fn bytes_processed(&self) -> u64 {
        self.file_size
    }

    fn total_bytes(&self) -> Option<u64> {
        Some(self.file_size)
    }
}

impl Iterator for JsonRecordIterator {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next().map(Ok)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}
