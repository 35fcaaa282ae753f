//! Core data models for packed interactions.

use serde::{Deserialize, Serialize};

/// One user/assistant exchange. Either side may be empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Turn {
    /// What the user said.
    pub user: String,
    /// What the assistant answered.
    pub assistant: String,
}

impl Turn {
    /// Creates a turn from both sides.
    pub fn new(user: impl Into<String>, assistant: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            assistant: assistant.into(),
        }
    }

    /// Returns `true` if the user side has no reply.
    pub fn is_unanswered(&self) -> bool {
        self.assistant.is_empty()
    }
}

/// Per-record metadata columns of the wide table.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InteractionMeta {
    /// Record identifier (`_id`).
    pub interaccion_id: Option<String>,
    /// Owning user.
    pub usuario_id: Option<String>,
    /// Exercise the interaction belongs to.
    pub ejercicio_id: Option<String>,
    /// Start time, ISO-8601 when parseable.
    pub inicio: Option<String>,
    /// End time, ISO-8601 when parseable.
    pub fin: Option<String>,
    /// Where the message list was found, or `fallback_from_fields`.
    pub ruta_mensajes: Option<String>,
    /// Messages located (or synthesized) before packing.
    pub num_mensajes_raw: usize,
    /// Turns kept after the cap.
    pub num_turnos_user_assistant: usize,
    /// Whether the messages were synthesized from flat fields.
    #[serde(default)]
    pub used_fallback: bool,
}

/// One processed record: metadata plus its capped turns.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Interaction {
    pub meta: InteractionMeta,
    pub turns: Vec<Turn>,
}

impl Interaction {
    /// Returns `true` if the turns were built from flat fields.
    pub fn used_fallback(&self) -> bool {
        self.meta.used_fallback
    }
}

/// Writer options for the wide table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// CSV field delimiter (default: `;`).
    pub delimiter: u8,
    /// Pretty-print JSON arrays.
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            delimiter: b';',
            pretty: false,
        }
    }
}

impl OutputConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_pretty(mut self) -> Self {
        self.pretty = true;
        self
    }
}
