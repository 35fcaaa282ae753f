//! Streaming JSON Lines source.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::PathBuf;

use serde_json::Value;
use tracing::warn;

use super::{RecordIterator, RecordSource};
use crate::config::SourceConfig;
use crate::error::{Result, TurnpackError};

/// Streams one record per non-blank line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonlSource {
    config: SourceConfig,
}

impl JsonlSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SourceConfig) -> Self {
        Self { config }
    }
}

impl RecordSource for JsonlSource {
    fn name(&self) -> &'static str {
        "JSON Lines"
    }

    fn records(&self, path: &str) -> Result<Box<dyn RecordIterator>> {
        let file = File::open(path)?;
        let file_size = file.metadata()?.len();
        let reader = BufReader::with_capacity(self.config.buffer_size, file);

        Ok(Box::new(
            JsonlRecordIterator::new(reader, file_size, self.config)
                .with_path(PathBuf::from(path)),
        ))
    }
}

/// Iterator over the lines of a JSON Lines reader.
///
/// Lines longer than `max_record_size` yield
/// [`BufferOverflow`](TurnpackError::BufferOverflow) without being buffered
/// in full. Malformed lines are skipped with a warning when `skip_invalid`
/// is set, otherwise returned as parse errors.
pub struct JsonlRecordIterator<R: BufRead> {
    reader: R,
    file_size: u64,
    bytes_read: u64,
    line_number: usize,
    config: SourceConfig,
    path: Option<PathBuf>,
    line_buffer: Vec<u8>,
}

impl<R: BufRead> JsonlRecordIterator<R> {
    pub fn new(reader: R, file_size: u64, config: SourceConfig) -> Self {
        Self {
            reader,
            file_size,
            bytes_read: 0,
            line_number: 0,
            config,
            path: None,
            line_buffer: Vec::with_capacity(4096),
        }
    }

    /// Attaches the file path to parse errors.
    #[must_use]
    pub fn with_path(mut self, path: PathBuf) -> Self {
        self.path = Some(path);
        self
    }

    /// Longest prefix read before a line counts as oversized: the record
    /// plus a CRLF terminator.
    fn read_limit(&self) -> usize {
        self.config.max_record_size + 2
    }

    /// Reads the next line, at most [`read_limit`](Self::read_limit) bytes of it.
    /// Returns the number of bytes consumed, 0 at EOF.
    fn read_line(&mut self) -> io::Result<usize> {
        self.line_buffer.clear();
        let limit = self.read_limit() as u64;
        let n = (&mut self.reader)
            .take(limit)
            .read_until(b'\n', &mut self.line_buffer)?;
        self.bytes_read += n as u64;
        Ok(n)
    }

    /// Consumes the remainder of an oversized line.
    fn discard_rest_of_line(&mut self) -> io::Result<usize> {
        let mut skipped = 0;
        loop {
            let available = self.reader.fill_buf()?;
            if available.is_empty() {
                break;
            }
            match available.iter().position(|&b| b == b'\n') {
                Some(i) => {
                    self.reader.consume(i + 1);
                    skipped += i + 1;
                    break;
                }
                None => {
                    let len = available.len();
                    self.reader.consume(len);
                    skipped += len;
                }
            }
        }
        self.bytes_read += skipped as u64;
        Ok(skipped)
    }

    fn record_bytes(&self) -> &[u8] {
        self.line_buffer.trim_ascii()
    }
}

impl<R: BufRead + Send> RecordIterator for JsonlRecordIterator<R> {
    fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }

    fn total_bytes(&self) -> Option<u64> {
        Some(self.file_size)
    }
}

impl<R: BufRead + Send> Iterator for JsonlRecordIterator<R> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let n = match self.read_line() {
                Ok(0) => return None,
                Ok(n) => n,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            let max = self.config.max_record_size;
            if n == self.read_limit() && !self.line_buffer.ends_with(b"\n") {
                return Some(match self.discard_rest_of_line() {
                    Ok(rest) => Err(TurnpackError::buffer_overflow(max, n + rest)),
                    Err(e) => Err(e.into()),
                });
            }

            let record = self.record_bytes();
            if record.is_empty() {
                continue;
            }
            if record.len() > max {
                return Some(Err(TurnpackError::buffer_overflow(max, record.len())));
            }

            match serde_json::from_slice::<Value>(record) {
                Ok(value) => return Some(Ok(value)),
                Err(e) if self.config.skip_invalid => {
                    warn!(line = self.line_number, error = %e, "skipping malformed record");
                }
                Err(e) => return Some(Err(TurnpackError::jsonl_parse(e, self.path.clone()))),
            }
        }
    }
}
