//! Packs normalized messages into ordered user/assistant turns.
//!
//! Packing runs in four stages, strictly in this order:
//!
//! 1. **Filter** - messages whose role is `system` are dropped.
//! 2. **Classify** - each survivor gets a [`RoleKind`].
//! 3. **Compact** - blank messages are dropped and consecutive messages of
//!    the same kind are joined with `\n` into one utterance.
//! 4. **Pair** - utterances are paired in order. A user utterance without a
//!    reply becomes `(user, "")`, an assistant utterance without a question
//!    becomes `("", assistant)`, and unknown speakers are folded into the
//!    nearest open side.
//!
//! The result depends only on the input order, never on timestamps.
//!
//! # Example
//!
//! ```rust
//! use turnpack::NormalizedMessage;
//! use turnpack::core::packer::pack;
//!
//! let msgs = vec![
//!     NormalizedMessage::new(Some("system"), Some("Eres un tutor.")),
//!     NormalizedMessage::new(Some("user"), Some("hola")),
//!     NormalizedMessage::new(Some("user"), Some("¿me ayudas?")),
//!     NormalizedMessage::new(Some("assistant"), Some("claro")),
//! ];
//!
//! let turns = pack(&msgs);
//! assert_eq!(turns.len(), 1);
//! assert_eq!(turns[0].user, "hola\n¿me ayudas?");
//! assert_eq!(turns[0].assistant, "claro");
//! ```

use crate::core::models::Turn;
use crate::message::{NormalizedMessage, RoleKind};

/// A run of same-kind messages after compaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    /// Speaker classification shared by the whole run.
    pub kind: RoleKind,
    /// Trimmed contents joined with `\n`.
    pub content: String,
}

/// Packs messages into turns.
pub fn pack(messages: &[NormalizedMessage]) -> Vec<Turn> {
    pair(compact(messages))
}

/// Runs the filter, classify and compact stages.
///
/// # Example
///
/// ```rust
/// use turnpack::{NormalizedMessage, RoleKind};
/// use turnpack::core::packer::compact;
///
/// let utterances = compact(&[
///     NormalizedMessage::new(Some("user"), Some("a")),
///     NormalizedMessage::new(Some("user"), Some("   ")),
///     NormalizedMessage::new(Some("usuario"), Some("b")),
/// ]);
///
/// assert_eq!(utterances.len(), 1);
/// assert_eq!(utterances[0].kind, RoleKind::User);
/// assert_eq!(utterances[0].content, "a\nb");
/// ```
pub fn compact(messages: &[NormalizedMessage]) -> Vec<Utterance> {
    let mut compacted: Vec<Utterance> = Vec::new();

    for msg in messages.iter().filter(|m| !m.is_system()) {
        let kind = msg.kind();
        let text = msg.content().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }

        match compacted.last_mut() {
            Some(last) if last.kind == kind => {
                last.content.push('\n');
                last.content.push_str(text);
            }
            _ => compacted.push(Utterance {
                kind,
                content: text.to_string(),
            }),
        }
    }

    compacted
}

/// Runs the pairing stage over compacted utterances.
pub fn pair(utterances: Vec<Utterance>) -> Vec<Turn> {
    let mut turns: Vec<Turn> = Vec::new();
    let mut open_user: Option<String> = None;

    for Utterance { kind, content } in utterances {
        match kind {
            RoleKind::User => {
                if let Some(unanswered) = open_user.take() {
                    turns.push(Turn::new(unanswered, ""));
                }
                open_user = Some(content);
            }
            RoleKind::Assistant => match open_user.take() {
                Some(question) => turns.push(Turn::new(question, content)),
                None => turns.push(Turn::new("", content)),
            },
            RoleKind::Unknown => {
                if let Some(question) = open_user.as_mut() {
                    append_line(question, &content);
                } else if let Some(last) = turns.last_mut() {
                    if last.assistant.is_empty() {
                        last.assistant = content;
                    } else {
                        append_line(&mut last.assistant, &content);
                    }
                } else {
                    turns.push(Turn::new("", content));
                }
            }
        }
    }

    if let Some(unanswered) = open_user {
        turns.push(Turn::new(unanswered, ""));
    }

    turns
}

/// Appends `\n` + `text`, trimming the joined result.
fn append_line(target: &mut String, text: &str) {
    let joined = format!("{target}\n{text}");
    *target = joined.trim().to_string();
}
