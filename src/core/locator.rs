//! Finds the message list inside an arbitrarily shaped document.
//!
//! Producers nest transcripts at any depth and under any key. The search is
//! depth-first and order-sensitive:
//!
//! 1. A non-empty list of maps where at least one map looks like a message
//!    is the answer.
//! 2. Any other list is searched element by element (first 50 only).
//! 3. A map is first searched under the hint keys (`messages`, `mensajes`,
//!    `chat`, `conversation`, `history`, `turns`), then under every key in
//!    document order.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use turnpack::core::locator::locate;
//!
//! let record = json!({
//!     "tags": [{"label": "algebra"}],
//!     "session": {"messages": [{"role": "user", "content": "hola"}]}
//! });
//!
//! let found = locate(&record);
//! assert_eq!(found.messages.len(), 1);
//! assert_eq!(found.path.as_deref(), Some("session.messages"));
//! ```

use serde_json::{Map, Value};
use tracing::trace;

use crate::config::LocatorConfig;

/// Keys searched before any other key of a map, in this order.
pub const HINT_KEYS: &[&str] = &[
    "messages",
    "mensajes",
    "chat",
    "conversation",
    "history",
    "turns",
];

/// A map with any of these keys looks like a message.
pub const MESSAGE_MARKER_KEYS: &[&str] = &[
    "role",
    "content",
    "text",
    "message",
    "mensaje",
    "sender",
    "author",
    "from",
    "timestamp",
    "createdAt",
    "ts",
];

/// Path reported when the document itself is the message list.
pub const ROOT_LIST_PATH: &str = "(root_list)";

/// Result of a search.
#[derive(Debug, Clone, PartialEq)]
pub struct Located<'a> {
    /// The message list, empty when nothing was found.
    pub messages: &'a [Value],
    /// Where the list was found (`data.chat`, `[0].messages`), `None` when nothing was found.
    pub path: Option<String>,
}

impl Located<'_> {
    /// Returns `true` when no message list was found.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    fn not_found() -> Self {
        Located {
            messages: &[],
            path: None,
        }
    }
}

/// Returns `true` if `value` is a map carrying any message marker key.
pub fn looks_like_message(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|map| MESSAGE_MARKER_KEYS.iter().any(|key| map.contains_key(*key)))
}

/// Searches `record` with the default bounds.
pub fn locate(record: &Value) -> Located<'_> {
    locate_with(record, &LocatorConfig::default())
}

/// Searches `record` with explicit depth and breadth bounds.
pub fn locate_with<'a>(record: &'a Value, config: &LocatorConfig) -> Located<'a> {
    match search(record, "", 0, config) {
        Some((messages, path)) => Located {
            messages,
            path: Some(path),
        },
        None => Located::not_found(),
    }
}

fn search<'a>(
    node: &'a Value,
    path: &str,
    depth: usize,
    config: &LocatorConfig,
) -> Option<(&'a [Value], String)> {
    if depth > config.max_depth {
        trace!(path, depth, "locator depth cap reached");
        return None;
    }

    match node {
        Value::Array(items) => search_list(items, path, depth, config),
        Value::Object(map) => search_map(map, path, depth, config),
        _ => None,
    }
}

fn search_list<'a>(
    items: &'a [Value],
    path: &str,
    depth: usize,
    config: &LocatorConfig,
) -> Option<(&'a [Value], String)> {
    if items.is_empty() {
        return None;
    }

    if items.iter().all(Value::is_object) && items.iter().any(looks_like_message) {
        let path = if path.is_empty() {
            ROOT_LIST_PATH.to_string()
        } else {
            path.to_string()
        };
        return Some((items, path));
    }

    items
        .iter()
        .take(config.max_elements)
        .enumerate()
        .find_map(|(i, item)| search(item, &format!("{path}[{i}]"), depth + 1, config))
}

fn search_map<'a>(
    map: &'a Map<String, Value>,
    path: &str,
    depth: usize,
    config: &LocatorConfig,
) -> Option<(&'a [Value], String)> {
    let hinted = HINT_KEYS.iter().find_map(|key| match map.get(*key) {
        Some(value @ Value::Array(_)) => search(value, &child_path(path, key), depth + 1, config),
        _ => None,
    });
    if hinted.is_some() {
        return hinted;
    }

    map.iter()
        .filter(|(_, value)| value.is_object() || value.is_array())
        .find_map(|(key, value)| search(value, &child_path(path, key), depth + 1, config))
}

fn child_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{path}.{key}")
    }
}
