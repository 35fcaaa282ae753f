//! Unified error types for turnpack.
//!
//! This module provides a single [`TurnpackError`] enum that covers every
//! failure the export pipeline can surface. The extraction engine itself
//! (locator, normalizer, packer) never fails: malformed documents degrade to
//! empty or orphan turns instead. Errors only come from the edges: reading
//! the export, parsing filter bounds, writing the report, and the one
//! semantic abort, [`TurnpackError::NoRecords`].

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// A specialized [`Result`] type for turnpack operations.
///
/// # Example
///
/// ```rust
/// use turnpack::error::Result;
/// use turnpack::core::Turn;
///
/// fn my_function() -> Result<Vec<Turn>> {
///     Ok(vec![])
/// }
/// ```
pub type Result<T> = std::result::Result<T, TurnpackError>;

/// The error type for all turnpack operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TurnpackError {
    /// An I/O error occurred.
    ///
    /// This typically happens when:
    /// - The input export doesn't exist
    /// - Permission denied
    /// - Disk is full (when writing the report)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Failed to parse the input export.
    ///
    /// Contains the format being parsed, the underlying parse error,
    /// and optionally the file path.
    #[error("Failed to parse {format} input{}: {source}", path.as_ref().map(|p| format!(" (file: {})", p.display())).unwrap_or_default())]
    Parse {
        /// The format being parsed (e.g., "JSON", "JSON Lines")
        format: &'static str,
        /// The underlying parse error
        #[source]
        source: ParseErrorKind,
        /// The file path, if available
        path: Option<PathBuf>,
    },

    /// The input or output format is not recognized.
    #[error("Invalid {format} format: {message}")]
    InvalidFormat {
        /// The format that was expected
        format: &'static str,
        /// Description of what's wrong
        message: String,
    },

    /// A date-range bound could not be interpreted as a date.
    #[error("Invalid date '{input}'. Expected format: {expected}")]
    InvalidDate {
        /// The invalid date string that was provided
        input: String,
        /// Expected format description
        expected: &'static str,
    },

    /// CSV writing error.
    #[cfg(feature = "csv-output")]
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Excel workbook writing error.
    #[cfg(feature = "xlsx-output")]
    #[error("XLSX error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single input record exceeded the maximum allowed size.
    #[error("Record too large: {actual_size} bytes (maximum: {max_size} bytes)")]
    BufferOverflow {
        /// Maximum allowed size in bytes
        max_size: usize,
        /// Actual size encountered
        actual_size: usize,
    },

    /// The source yielded no records (after filtering), so there is nothing to export.
    #[error("No records found to export")]
    NoRecords,
}

/// Kinds of parse errors that can occur.
#[derive(Debug, Error)]
pub enum ParseErrorKind {
    /// JSON parsing error
    #[error("{0}")]
    Json(#[from] serde_json::Error),
    /// Generic parsing error
    #[error("{0}")]
    Other(String),
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl TurnpackError {
    /// Creates a parse error for a whole-document JSON input.
    pub fn json_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        TurnpackError::Parse {
            format: "JSON",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates a parse error for one line of a JSON Lines input.
    pub fn jsonl_parse(source: serde_json::Error, path: Option<PathBuf>) -> Self {
        TurnpackError::Parse {
            format: "JSON Lines",
            source: ParseErrorKind::Json(source),
            path,
        }
    }

    /// Creates an invalid format error.
    pub fn invalid_format(format: &'static str, message: impl Into<String>) -> Self {
        TurnpackError::InvalidFormat {
            format,
            message: message.into(),
        }
    }

    /// Creates an invalid date error.
    pub fn invalid_date(input: impl Into<String>) -> Self {
        TurnpackError::InvalidDate {
            input: input.into(),
            expected: "a date such as YYYY-MM-DD or an RFC 3339 timestamp",
        }
    }

    /// Creates a buffer overflow error.
    pub fn buffer_overflow(max_size: usize, actual_size: usize) -> Self {
        TurnpackError::BufferOverflow {
            max_size,
            actual_size,
        }
    }

    /// Returns `true` if this is an IO error.
    pub fn is_io(&self) -> bool {
        matches!(self, TurnpackError::Io(_))
    }

    /// Returns `true` if this is a parse error.
    pub fn is_parse(&self) -> bool {
        matches!(self, TurnpackError::Parse { .. })
    }

    /// Returns `true` if this is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        matches!(self, TurnpackError::InvalidFormat { .. })
    }

    /// Returns `true` if this is a date-related error.
    pub fn is_invalid_date(&self) -> bool {
        matches!(self, TurnpackError::InvalidDate { .. })
    }

    /// Returns `true` if the export had nothing to process.
    pub fn is_no_records(&self) -> bool {
        matches!(self, TurnpackError::NoRecords)
    }
}
