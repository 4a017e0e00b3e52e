//! Client-side value objects: identifiers, chat mode, interests.

use serde::Serialize;
use uuid::Uuid;

use super::DomainError;

/// Unix timestamp in milliseconds (UTC)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Create a new Timestamp from Unix milliseconds
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    /// Get the raw Unix milliseconds value
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Opaque client identifier, stable for the lifetime of one connection
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ClientId(String);

impl ClientId {
    /// Create a ClientId from an existing string
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyClientId`] if the string is empty.
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::EmptyClientId);
        }
        Ok(Self(id))
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Factory for server-allocated client ids
pub struct ClientIdFactory;

impl ClientIdFactory {
    /// Allocate a fresh, unique client id
    pub fn generate() -> ClientId {
        ClientId(Uuid::new_v4().to_string())
    }
}

/// Conversation mode requested by a client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatMode {
    /// Text-only chat over the data channel
    Text,
    /// Video chat (camera + microphone)
    Video,
}

impl std::fmt::Display for ChatMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChatMode::Text => write!(f, "text"),
            ChatMode::Video => write!(f, "video"),
        }
    }
}

/// Set of case-sensitive interest tokens, may be empty
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Interests(Vec<String>);

impl Interests {
    /// Create a new interest set from raw tokens
    pub fn new(tokens: Vec<String>) -> Self {
        Self(tokens)
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether this set shares at least one token with `other`
    ///
    /// Tokens are compared case-sensitively.
    pub fn intersects(&self, other: &Interests) -> bool {
        self.0.iter().any(|token| other.0.contains(token))
    }

    /// Get the tokens as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

/// One connected participant.
///
/// Owned exclusively by the [`Matchboard`](super::Matchboard) registry; the
/// waiting queue and sessions reference it by id only.
#[derive(Debug, Clone, Serialize)]
pub struct Client {
    /// Server-allocated identifier
    pub id: ClientId,
    /// Interests from the most recent find-peer request (empty until then)
    pub interests: Interests,
    /// Mode from the most recent find-peer request (unset until then)
    pub mode: Option<ChatMode>,
    /// When the connection was registered
    pub connected_at: Timestamp,
}

impl Client {
    /// Create a freshly connected client with empty interests and unset mode
    pub fn new(id: ClientId, connected_at: Timestamp) -> Self {
        Self {
            id,
            interests: Interests::default(),
            mode: None,
            connected_at,
        }
    }
}
