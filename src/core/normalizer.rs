//! Converts one located message into a [`NormalizedMessage`].
//!
//! [`normalize`] is total: every input, however malformed, produces a
//! well-formed message. Field names are resolved through the ordered alias
//! tables in [`crate::parsing::lookup`].

use serde_json::Value;

use crate::message::{NormalizedMessage, normalize_role};
use crate::parsing::lookup::{CONTENT_KEYS, ROLE_KEYS, TIMESTAMP_KEYS, pick_first, stringify};
use crate::parsing::timestamp::to_iso;

/// Normalizes one message value.
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use turnpack::core::normalizer::normalize;
///
/// let msg = normalize(&json!({
///     "sender": " Tutor ",
///     "text": "Piensa en la pendiente.",
///     "ts": 1705314600
/// }));
///
/// assert_eq!(msg.role(), Some("tutor"));
/// assert_eq!(msg.content(), Some("Piensa en la pendiente."));
/// assert_eq!(msg.timestamp(), Some("2024-01-15T10:30:00+00:00"));
/// ```
pub fn normalize(msg: &Value) -> NormalizedMessage {
    let Value::Object(map) = msg else {
        let text = stringify(msg);
        return NormalizedMessage {
            role: None,
            content: Some(text.clone()),
            timestamp: None,
            raw_json: text,
        };
    };

    NormalizedMessage {
        role: pick_first(map, ROLE_KEYS).map(|v| normalize_role(&stringify(v))),
        content: pick_first(map, CONTENT_KEYS).map(stringify),
        timestamp: pick_first(map, TIMESTAMP_KEYS).and_then(to_iso),
        raw_json: msg.to_string(),
    }
}

/// Normalizes every message of a located list, preserving order.
pub fn normalize_all(messages: &[Value]) -> Vec<NormalizedMessage> {
    messages.iter().map(normalize).collect()
}
