//! Field alias tables and duck-typed value helpers.
//!
//! Interaction documents come from several producers, each with its own
//! naming. Every concept the engine reads (role, content, timestamp, the
//! flat-field fallback, the record bounds) is described here as an ordered
//! list of candidate keys, and one predicate decides whether a value counts
//! as present.

use serde_json::{Map, Value};

/// Keys that carry a message's speaker, most specific first.
pub const ROLE_KEYS: &[&str] = &["role", "sender", "from", "author", "tipo", "type"];

/// Keys that carry a message's text.
pub const CONTENT_KEYS: &[&str] = &[
    "content", "text", "message", "mensaje", "respuesta", "output", "input",
];

/// Keys that carry a message's timestamp.
pub const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time", "date", "createdAt", "ts"];

/// Flat record fields holding the user side of a single-shot interaction.
pub const FALLBACK_USER_KEYS: &[&str] = &[
    "input",
    "pregunta",
    "mensaje_usuario",
    "userMessage",
    "user_message",
    "prompt",
];

/// Flat record fields holding the assistant side of a single-shot interaction.
pub const FALLBACK_ASSISTANT_KEYS: &[&str] = &[
    "output",
    "respuesta",
    "mensaje_ia",
    "assistantMessage",
    "assistant_message",
    "respuesta_ia",
];

/// Record fields for the interaction start.
pub const START_KEYS: &[&str] = &["inicio", "createdAt", "start"];

/// Record fields for the interaction end.
pub const END_KEYS: &[&str] = &["fin", "updatedAt", "end"];

/// Returns `true` unless the value is `null` or the empty string.
///
/// Whitespace-only strings, `0` and `false` are present.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    }
}

/// Returns the value of the first key in `keys` whose value [`is_present`].
///
/// # Example
///
/// ```rust
/// use serde_json::json;
/// use turnpack::parsing::lookup::{pick_first, ROLE_KEYS};
///
/// let msg = json!({"role": "", "sender": "alumno"});
/// let role = pick_first(msg.as_object().unwrap(), ROLE_KEYS);
/// assert_eq!(role, Some(&json!("alumno")));
/// ```
pub fn pick_first<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_present(value))
}

/// Truthiness as loosely-typed producers use it: `null`, `false`, zero,
/// empty strings and empty containers are all falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Returns the value of the first key in `keys` whose value [`is_truthy`].
pub fn first_truthy<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| is_truthy(value))
}

/// Renders any value as text: strings verbatim, everything else as compact JSON.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Renders a document identifier.
///
/// Extended-JSON object ids (`{"$oid": "..."}`) are unwrapped to their hex
/// string; `null` means absent.
pub fn identifier(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Object(map) => match map.get("$oid") {
            Some(Value::String(oid)) => Some(oid.clone()),
            _ => Some(stringify(value)),
        },
        other => Some(stringify(other)),
    }
}

/// Resolves a dotted field path (`meta.created`) against a document.
pub fn get_path<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(value, |node, segment| node.as_object()?.get(segment))
}
