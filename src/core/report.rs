//! Two-pass pivot of processed records into a wide table.
//!
//! Pass one processes every record and tracks the largest turn count. Pass
//! two lays each interaction out as one row with `U1, A1 ... Un, An` columns,
//! padding shorter interactions with empty cells. The column count is only
//! known once every record has been seen, so building is all-or-nothing.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use turnpack::config::ExportConfig;
//! use turnpack::core::report::Report;
//!
//! # fn main() -> turnpack::Result<()> {
//! let records = vec![
//!     json!({"_id": "a", "messages": [
//!         {"role": "user", "content": "q1"}, {"role": "assistant", "content": "a1"},
//!         {"role": "user", "content": "q2"}, {"role": "assistant", "content": "a2"}
//!     ]}),
//!     json!({"_id": "b", "input": "hola", "output": "buenas"}),
//! ];
//!
//! let report = Report::build(records, &ExportConfig::default())?;
//! assert_eq!(report.max_turns(), 2);
//! assert_eq!(report.header().len(), 8 + 4);
//!
//! let rows = report.rows();
//! assert_eq!(rows[1][8..], ["hola", "buenas", "", ""]);
//! # Ok(())
//! # }
//! ```

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::config::ExportConfig;
use crate::core::filter::RecordFilter;
use crate::core::models::Interaction;
use crate::core::processor::process_record;
use crate::error::{Result, TurnpackError};

/// Metadata columns, in output order.
pub const META_COLUMNS: &[&str] = &[
    "interaccion_id",
    "usuario_id",
    "ejercicio_id",
    "inicio",
    "fin",
    "num_turnos_user_assistant",
    "num_mensajes_raw",
    "ruta_mensajes",
];

/// Column name of the user side of turn `n` (1-based).
pub fn user_column(n: usize) -> String {
    format!("U{n}")
}

/// Column name of the assistant side of turn `n` (1-based).
pub fn assistant_column(n: usize) -> String {
    format!("A{n}")
}

/// Summary numbers for a built report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ReportStats {
    pub records: usize,
    pub raw_messages: usize,
    pub turns: usize,
    pub max_turns: usize,
    pub fallback_records: usize,
}

impl ReportStats {
    /// Average kept turns per record.
    pub fn avg_turns(&self) -> f64 {
        if self.records == 0 {
            return 0.0;
        }
        self.turns as f64 / self.records as f64
    }
}

/// The wide table: processed interactions plus the global turn width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    interactions: Vec<Interaction>,
    max_turns: usize,
}

impl Report {
    /// Processes `records` and pivots them.
    ///
    /// # Errors
    ///
    /// Returns [`TurnpackError::NoRecords`] if `records` is empty.
    pub fn build<I>(records: I, config: &ExportConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Value>,
    {
        let interactions = records
            .into_iter()
            .map(|record| process_record(&record, config))
            .collect();
        Self::from_interactions(interactions)
    }

    /// Processes a fallible record stream, skipping records rejected by `filter`.
    ///
    /// # Errors
    ///
    /// Returns the first source error, or [`TurnpackError::NoRecords`] if no
    /// record passed the filter.
    pub fn try_build<I>(records: I, filter: &RecordFilter, config: &ExportConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Result<Value>>,
    {
        let mut interactions = Vec::new();
        for record in records {
            let record = record?;
            if filter.matches(&record) {
                interactions.push(process_record(&record, config));
            }
        }
        Self::from_interactions(interactions)
    }

    /// Pivots already processed interactions.
    ///
    /// # Errors
    ///
    /// Returns [`TurnpackError::NoRecords`] if `interactions` is empty.
    pub fn from_interactions(interactions: Vec<Interaction>) -> Result<Self> {
        if interactions.is_empty() {
            return Err(TurnpackError::NoRecords);
        }

        let max_turns = interactions
            .iter()
            .map(|i| i.turns.len())
            .max()
            .unwrap_or_default();

        let report = Self {
            interactions,
            max_turns,
        };

        let stats = report.stats();
        info!(
            records = stats.records,
            max_turns = stats.max_turns,
            fallback = stats.fallback_records,
            "report built"
        );

        Ok(report)
    }

    /// Processed interactions in input order.
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Largest turn count across all interactions.
    pub fn max_turns(&self) -> usize {
        self.max_turns
    }

    pub fn len(&self) -> usize {
        self.interactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interactions.is_empty()
    }

    /// Column names: metadata, then `U1, A1, ... Un, An`.
    pub fn header(&self) -> Vec<String> {
        let mut header: Vec<String> = META_COLUMNS.iter().map(ToString::to_string).collect();
        for n in 1..=self.max_turns {
            header.push(user_column(n));
            header.push(assistant_column(n));
        }
        header
    }

    /// Every row as text cells aligned with [`header`](Self::header).
    ///
    /// Missing metadata and turns beyond a row's own count are empty strings.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.interactions
            .iter()
            .map(|interaction| self.text_row(interaction))
            .collect()
    }

    /// Every row as a JSON object with keys in column order.
    ///
    /// Counts are numbers and missing metadata is `null`.
    pub fn row_objects(&self) -> Vec<Map<String, Value>> {
        self.interactions
            .iter()
            .map(|interaction| self.object_row(interaction))
            .collect()
    }

    pub fn stats(&self) -> ReportStats {
        ReportStats {
            records: self.interactions.len(),
            raw_messages: self.interactions.iter().map(|i| i.meta.num_mensajes_raw).sum(),
            turns: self.interactions.iter().map(|i| i.turns.len()).sum(),
            max_turns: self.max_turns,
            fallback_records: self.interactions.iter().filter(|i| i.used_fallback()).count(),
        }
    }

    fn text_row(&self, interaction: &Interaction) -> Vec<String> {
        let meta = &interaction.meta;
        let text = |v: &Option<String>| v.clone().unwrap_or_default();

        let mut row = vec![
            text(&meta.interaccion_id),
            text(&meta.usuario_id),
            text(&meta.ejercicio_id),
            text(&meta.inicio),
            text(&meta.fin),
            meta.num_turnos_user_assistant.to_string(),
            meta.num_mensajes_raw.to_string(),
            text(&meta.ruta_mensajes),
        ];
        row.reserve(self.max_turns * 2);

        for n in 0..self.max_turns {
            match interaction.turns.get(n) {
                Some(turn) => {
                    row.push(turn.user.clone());
                    row.push(turn.assistant.clone());
                }
                None => {
                    row.push(String::new());
                    row.push(String::new());
                }
            }
        }
        row
    }

    fn object_row(&self, interaction: &Interaction) -> Map<String, Value> {
        let meta = &interaction.meta;
        let opt = |v: &Option<String>| v.clone().map_or(Value::Null, Value::String);

        let mut row = Map::new();
        row.insert("interaccion_id".into(), opt(&meta.interaccion_id));
        row.insert("usuario_id".into(), opt(&meta.usuario_id));
        row.insert("ejercicio_id".into(), opt(&meta.ejercicio_id));
        row.insert("inicio".into(), opt(&meta.inicio));
        row.insert("fin".into(), opt(&meta.fin));
        row.insert(
            "num_turnos_user_assistant".into(),
            meta.num_turnos_user_assistant.into(),
        );
        row.insert("num_mensajes_raw".into(), meta.num_mensajes_raw.into());
        row.insert("ruta_mensajes".into(), opt(&meta.ruta_mensajes));

        for n in 0..self.max_turns {
            let (user, assistant) = interaction
                .turns
                .get(n)
                .map(|t| (t.user.clone(), t.assistant.clone()))
                .unwrap_or_default();
            row.insert(user_column(n + 1), Value::String(user));
            row.insert(assistant_column(n + 1), Value::String(assistant));
        }
        row
    }
}
