//! Canonical message type and speaker classification.
//!
//! Every located message, whatever its original shape, is normalized into a
//! [`NormalizedMessage`]. The turn packer then only needs the coarse
//! [`RoleKind`] of each message to rebuild the dialogue.
//!
//! # Examples
//!
//! ```
//! use turnpack::{NormalizedMessage, RoleKind};
//!
//! let msg = NormalizedMessage::new(Some("Alumno"), Some("¿Qué es una derivada?"));
//! assert_eq!(msg.role(), Some("alumno"));
//! assert_eq!(msg.kind(), RoleKind::User);
//! ```

use serde::{Deserialize, Serialize};

/// Roles classified as the human side of the dialogue.
pub const USER_ROLES: &[&str] = &["user", "usuario", "alumno", "student", "human"];

/// Roles classified as the machine side of the dialogue.
///
/// `system` is listed here for classification, but the packer drops
/// system messages before pairing.
pub const ASSISTANT_ROLES: &[&str] = &["assistant", "asistente", "tutor", "ia", "ai", "system"];

/// Role excluded from turn packing.
pub const SYSTEM_ROLE: &str = "system";

/// Coarse speaker classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoleKind {
    /// The person asking.
    User,
    /// The tutor or model answering.
    Assistant,
    /// Anything else, including a missing role.
    Unknown,
}

impl RoleKind {
    /// Classifies a raw role string, ignoring ASCII case.
    ///
    /// # Example
    ///
    /// ```rust
    /// use turnpack::RoleKind;
    ///
    /// assert_eq!(RoleKind::classify(Some("HUMAN")), RoleKind::User);
    /// assert_eq!(RoleKind::classify(Some("tutor")), RoleKind::Assistant);
    /// assert_eq!(RoleKind::classify(Some("narrator")), RoleKind::Unknown);
    /// assert_eq!(RoleKind::classify(None), RoleKind::Unknown);
    /// ```
    pub fn classify(role: Option<&str>) -> Self {
        let Some(role) = role.filter(|r| !r.is_empty()) else {
            return RoleKind::Unknown;
        };
        let role = role.to_lowercase();
        if USER_ROLES.contains(&role.as_str()) {
            RoleKind::User
        } else if ASSISTANT_ROLES.contains(&role.as_str()) {
            RoleKind::Assistant
        } else {
            RoleKind::Unknown
        }
    }
}

impl std::fmt::Display for RoleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RoleKind::User => write!(f, "USER"),
            RoleKind::Assistant => write!(f, "ASSISTANT"),
            RoleKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

/// One message in canonical form.
///
/// | Field | Description |
/// |-------|-------------|
/// | `role` | speaker, lower-cased and trimmed |
/// | `content` | message text |
/// | `timestamp` | ISO-8601 text, or the original string when unparseable |
/// | `raw_json` | compact JSON of the source value, kept for auditing |
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NormalizedMessage {
    /// Speaker, lower-cased and trimmed.
    pub role: Option<String>,

    /// Message text.
    pub content: Option<String>,

    /// ISO-8601 timestamp, when the source had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub timestamp: Option<String>,

    /// Serialization of the original message.
    #[serde(default)]
    pub raw_json: String,
}

impl NormalizedMessage {
    /// Creates a message from a role and content, normalizing the role.
    ///
    /// `raw_json` is left empty; the normalizer fills it for located messages.
    pub fn new(role: Option<&str>, content: Option<&str>) -> Self {
        Self {
            role: role.map(normalize_role),
            content: content.map(ToString::to_string),
            timestamp: None,
            raw_json: String::new(),
        }
    }

    /// Builder method to set the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Builder method to set the raw serialization.
    #[must_use]
    pub fn with_raw_json(mut self, raw_json: impl Into<String>) -> Self {
        self.raw_json = raw_json.into();
        self
    }

    /// Returns the normalized role, if any.
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref()
    }

    /// Returns the content, if any.
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Returns the timestamp text, if any.
    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    /// Returns the speaker classification.
    pub fn kind(&self) -> RoleKind {
        RoleKind::classify(self.role())
    }

    /// Returns `true` for system prompts, which never reach a turn.
    pub fn is_system(&self) -> bool {
        self.role().is_some_and(|r| r.to_lowercase() == SYSTEM_ROLE)
    }

    /// Returns `true` if the content is missing or whitespace-only.
    pub fn is_empty(&self) -> bool {
        self.content().is_none_or(|c| c.trim().is_empty())
    }
}

/// Lower-cases and trims a raw role.
pub(crate) fn normalize_role(role: &str) -> String {
    role.to_lowercase().trim().to_string()
}
