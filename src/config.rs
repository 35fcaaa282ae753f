//! Configuration types for the export pipeline.
//!
//! This module provides plain configuration structs for library usage,
//! without any CLI framework dependencies. The binary fills them from
//! command-line flags and environment variables.
//!
//! - [`LocatorConfig`] - search bounds for the message locator
//! - [`ExportConfig`] - per-record processing (turn cap, locator bounds)
//! - [`SourceConfig`] - reading export files
//!
//! # Example
//!
//! ```rust
//! use turnpack::config::{ExportConfig, LocatorConfig};
//!
//! let config = ExportConfig::new()
//!     .with_max_turns(20)
//!     .with_locator(LocatorConfig::new().with_max_depth(8));
//!
//! assert_eq!(config.max_turns, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Default maximum nesting depth the locator descends into.
pub const MAX_DEPTH: usize = 32;

/// Default number of sequence elements the locator inspects per list.
pub const MAX_SCAN_ELEMENTS: usize = 50;

/// Default cap on turns kept per interaction.
pub const DEFAULT_MAX_TURNS: usize = 40;

/// Search bounds for [`locate_with`](crate::core::locator::locate_with).
///
/// Producer-controlled documents can be arbitrarily deep and wide; both
/// dimensions are capped explicitly rather than left to the call stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Nodes nested deeper than this are not searched (default: 32).
    pub max_depth: usize,

    /// Only the first `max_elements` items of a sequence are searched (default: 50).
    pub max_elements: usize,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_DEPTH,
            max_elements: MAX_SCAN_ELEMENTS,
        }
    }
}

impl LocatorConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum search depth.
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Sets the per-sequence breadth cap.
    #[must_use]
    pub fn with_max_elements(mut self, count: usize) -> Self {
        self.max_elements = count;
        self
    }
}

/// Per-record processing options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Turns beyond this count are dropped from a record (default: 40).
    pub max_turns: usize,

    /// Locator search bounds.
    pub locator: LocatorConfig,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            max_turns: DEFAULT_MAX_TURNS,
            locator: LocatorConfig::default(),
        }
    }
}

impl ExportConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-record turn cap.
    #[must_use]
    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Sets the locator bounds.
    #[must_use]
    pub fn with_locator(mut self, locator: LocatorConfig) -> Self {
        self.locator = locator;
        self
    }
}

/// Options for reading export files.
///
/// # Example
///
/// ```rust
/// use turnpack::config::SourceConfig;
///
/// let config = SourceConfig::new()
///     .with_buffer_size(128 * 1024)
///     .with_skip_invalid(false);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Buffer size for file reading (default: 64KB)
    pub buffer_size: usize,

    /// Maximum size of a single JSON Lines record in bytes (default: 10MB)
    pub max_record_size: usize,

    /// Skip malformed records instead of returning errors (default: true)
    pub skip_invalid: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            buffer_size: 64 * 1024,            // 64KB
            max_record_size: 10 * 1024 * 1024, // 10MB
            skip_invalid: true,
        }
    }
}

impl SourceConfig {
    /// Creates a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size;
        self
    }

    /// Sets the maximum record size.
    #[must_use]
    pub fn with_max_record_size(mut self, size: usize) -> Self {
        self.max_record_size = size;
        self
    }

    /// Sets whether to skip malformed records.
    #[must_use]
    pub fn with_skip_invalid(mut self, skip: bool) -> Self {
        self.skip_invalid = skip;
        self
    }
}
