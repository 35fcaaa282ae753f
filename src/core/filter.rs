//! Filter records by a date range on one of their fields.
//!
//! A [`RecordFilter`] is active only when both a field and at least one
//! bound are set. Bounds are inclusive.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use turnpack::core::filter::{RecordFilter, apply_filters};
//!
//! # fn main() -> turnpack::Result<()> {
//! let records = vec![
//!     json!({"_id": 1, "createdAt": {"$date": "2024-01-10T09:00:00Z"}}),
//!     json!({"_id": 2, "createdAt": {"$date": "2024-06-15T09:00:00Z"}}),
//!     json!({"_id": 3}),
//! ];
//!
//! let filter = RecordFilter::new()
//!     .with_field("createdAt")
//!     .with_date_from("2024-06-01")?;
//!
//! let kept = apply_filters(records, &filter);
//! assert_eq!(kept.len(), 1);
//! assert_eq!(kept[0]["_id"], 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Behavior Notes
//!
//! - Records whose field is missing or not a readable date are **excluded**
//!   while the filter is active
//! - Naive dates (no offset) are read as UTC, for both bounds and values
//! - Dotted field names (`meta.created`) reach into nested maps

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::error::TurnpackError;
use crate::parsing::lookup::get_path;
use crate::parsing::timestamp::{interpret, parse_datetime};

/// Date-range criteria for whole records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordFilter {
    /// Field holding the record date.
    pub field: Option<String>,

    /// Include only records on or after this instant.
    pub after: Option<DateTime<Utc>>,

    /// Include only records on or before this instant.
    pub before: Option<DateTime<Utc>>,
}

impl RecordFilter {
    /// Creates an inactive filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the field the bounds apply to.
    #[must_use]
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Sets the lower bound (inclusive).
    ///
    /// Accepts anything the timestamp interpreter reads: `2024-06-01`,
    /// `2024-06-01T08:00:00Z`, `06/01/2024`...
    ///
    /// # Errors
    ///
    /// Returns [`TurnpackError::InvalidDate`] if the text is not a date.
    pub fn with_date_from(mut self, date_str: &str) -> Result<Self, TurnpackError> {
        self.after = Some(parse_bound(date_str)?);
        Ok(self)
    }

    /// Sets the upper bound (inclusive).
    ///
    /// A date-only bound means midnight at the start of that day.
    ///
    /// # Errors
    ///
    /// Returns [`TurnpackError::InvalidDate`] if the text is not a date.
    pub fn with_date_to(mut self, date_str: &str) -> Result<Self, TurnpackError> {
        self.before = Some(parse_bound(date_str)?);
        Ok(self)
    }

    /// Sets the lower bound directly.
    #[must_use]
    pub fn with_after(mut self, dt: DateTime<Utc>) -> Self {
        self.after = Some(dt);
        self
    }

    /// Sets the upper bound directly.
    #[must_use]
    pub fn with_before(mut self, dt: DateTime<Utc>) -> Self {
        self.before = Some(dt);
        self
    }

    /// Returns `true` if the filter constrains anything.
    pub fn is_active(&self) -> bool {
        self.field.is_some() && (self.after.is_some() || self.before.is_some())
    }

    /// Returns `true` if `record` passes the filter.
    pub fn matches(&self, record: &Value) -> bool {
        let Some(field) = self.field.as_deref().filter(|_| self.is_active()) else {
            return true;
        };

        let Some(ts) = get_path(record, field).and_then(interpret) else {
            return false;
        };
        let ts = ts.to_utc();

        if self.after.is_some_and(|after| ts < after) {
            return false;
        }
        if self.before.is_some_and(|before| ts > before) {
            return false;
        }
        true
    }
}

fn parse_bound(date_str: &str) -> Result<DateTime<Utc>, TurnpackError> {
    parse_datetime(date_str)
        .map(|ts| ts.to_utc())
        .ok_or_else(|| TurnpackError::invalid_date(date_str))
}

/// Keeps the records that pass `filter`, preserving order.
pub fn apply_filters(records: Vec<Value>, filter: &RecordFilter) -> Vec<Value> {
    if !filter.is_active() {
        return records;
    }
    records.into_iter().filter(|r| filter.matches(r)).collect()
}
