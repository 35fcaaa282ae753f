//! Per-record processing: locate, normalize, pack, cap.
//!
//! [`process_record`] turns one raw document into an [`Interaction`]. When
//! the locator finds no message list, up to two pseudo-messages are built
//! from well-known flat fields (`input`/`output`, `pregunta`/`respuesta`, ...)
//! and the path is reported as [`FALLBACK_PATH`].
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use turnpack::config::ExportConfig;
//! use turnpack::core::processor::{process_record, FALLBACK_PATH};
//!
//! let record = json!({"_id": {"$oid": "65a1"}, "input": "2+2?", "output": "4"});
//! let interaction = process_record(&record, &ExportConfig::default());
//!
//! assert_eq!(interaction.meta.interaccion_id.as_deref(), Some("65a1"));
//! assert_eq!(interaction.meta.ruta_mensajes.as_deref(), Some(FALLBACK_PATH));
//! assert_eq!(interaction.turns[0].user, "2+2?");
//! assert_eq!(interaction.turns[0].assistant, "4");
//! ```

use serde_json::{Map, Value, json};
use tracing::debug;

use crate::config::ExportConfig;
use crate::core::locator::locate_with;
use crate::core::models::{Interaction, InteractionMeta};
use crate::core::normalizer::normalize_all;
use crate::core::packer::pack;
use crate::parsing::lookup::{
    END_KEYS, FALLBACK_ASSISTANT_KEYS, FALLBACK_USER_KEYS, START_KEYS, first_truthy, identifier,
    is_truthy, pick_first,
};
use crate::parsing::timestamp::to_iso;

/// Path reported when messages were synthesized from flat fields.
pub const FALLBACK_PATH: &str = "fallback_from_fields";

/// Record fields holding the user-side fallback timestamp.
const FALLBACK_USER_TIME_KEYS: &[&str] = &["inicio", "createdAt"];

/// Record fields holding the assistant-side fallback timestamp.
const FALLBACK_ASSISTANT_TIME_KEYS: &[&str] = &["fin", "updatedAt"];

/// Processes one record into metadata and capped turns.
pub fn process_record(record: &Value, config: &ExportConfig) -> Interaction {
    let empty = Map::new();
    let fields = record.as_object().unwrap_or(&empty);

    let located = locate_with(record, &config.locator);
    let used_fallback = located.is_empty();
    let (messages, path) = if used_fallback {
        debug!("no message list found, building messages from flat fields");
        (fallback_messages(fields), FALLBACK_PATH.to_string())
    } else {
        (located.messages.to_vec(), located.path.unwrap_or_default())
    };

    let normalized = normalize_all(&messages);
    let mut turns = pack(&normalized);
    turns.truncate(config.max_turns);

    let meta = InteractionMeta {
        interaccion_id: fields.get("_id").and_then(identifier),
        usuario_id: fields.get("usuario_id").and_then(identifier),
        ejercicio_id: fields.get("ejercicio_id").and_then(identifier),
        inicio: first_truthy(fields, START_KEYS).and_then(to_iso),
        fin: first_truthy(fields, END_KEYS).and_then(to_iso),
        ruta_mensajes: Some(path),
        num_mensajes_raw: messages.len(),
        num_turnos_user_assistant: turns.len(),
        used_fallback,
    };

    debug!(
        id = meta.interaccion_id.as_deref().unwrap_or(""),
        path = meta.ruta_mensajes.as_deref().unwrap_or(""),
        messages = meta.num_mensajes_raw,
        turns = meta.num_turnos_user_assistant,
        "processed record"
    );

    Interaction { meta, turns }
}

/// Builds pseudo-messages from flat question/answer fields.
fn fallback_messages(fields: &Map<String, Value>) -> Vec<Value> {
    let sides = [
        ("user", FALLBACK_USER_KEYS, FALLBACK_USER_TIME_KEYS),
        ("assistant", FALLBACK_ASSISTANT_KEYS, FALLBACK_ASSISTANT_TIME_KEYS),
    ];

    sides
        .into_iter()
        .filter_map(|(role, text_keys, time_keys)| {
            let text = pick_first(fields, text_keys).filter(|v| is_truthy(v))?;
            let timestamp = first_truthy(fields, time_keys).cloned().unwrap_or(Value::Null);
            Some(json!({"role": role, "content": text, "timestamp": timestamp}))
        })
        .collect()
}
