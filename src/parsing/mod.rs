//! Field lookup and value interpretation shared by the engine.
//!
//! - [`lookup`] - ordered alias tables and presence/truthiness predicates
//! - [`timestamp`] - best-effort ISO-8601 interpreter

pub mod lookup;
pub mod timestamp;

pub use lookup::{pick_first, stringify};
pub use timestamp::{ParsedTimestamp, parse_datetime, to_iso};
