//! WebSocket wire protocol events.
//!
//! Every event is a JSON object tagged with a kebab-case `"type"` field.
//! Inbound events are validated at this boundary before they reach the
//! dispatcher; a payload that does not deserialize is dropped by the
//! handler without tearing down the connection.
//!
//! Offer / answer / ICE candidate payloads are opaque `serde_json::Value`s:
//! the service forwards them verbatim and never inspects their structure.

use serde::{Deserialize, Serialize};

/// Conversation mode on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatModeDto {
    /// Text-only chat
    Text,
    /// Video chat
    Video,
}

/// Events received from a client
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Request matchmaking with the given criteria
    FindPeer {
        /// Interest tokens; empty means "match anyone"
        #[serde(default)]
        interests: Vec<String>,
        /// Requested conversation mode
        mode: ChatModeDto,
    },
    /// WebRTC session description, relayed to the peer
    Offer {
        /// Opaque session description payload
        offer: serde_json::Value,
    },
    /// WebRTC session description answering an offer, relayed to the peer
    Answer {
        /// Opaque session description payload
        answer: serde_json::Value,
    },
    /// WebRTC network candidate, relayed to the peer
    IceCandidate {
        /// Opaque candidate payload
        candidate: serde_json::Value,
    },
    /// Text chat payload, relayed to the peer
    ChatMessage {
        /// The chat text
        message: String,
    },
    /// Voluntary leave of the current session
    DisconnectPeer,
}

/// Events sent to a client
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// No match found yet; the client is enqueued
    WaitingForPeer,
    /// A session has been established
    PeerFound {
        /// Id of the created session
        #[serde(rename = "roomId")]
        room_id: String,
        /// Id of the matched partner
        #[serde(rename = "peerId")]
        peer_id: String,
    },
    /// Relayed session description
    Offer {
        /// Opaque session description payload
        offer: serde_json::Value,
        /// Id of the sending client
        from: String,
    },
    /// Relayed session description
    Answer {
        /// Opaque session description payload
        answer: serde_json::Value,
        /// Id of the sending client
        from: String,
    },
    /// Relayed network candidate
    IceCandidate {
        /// Opaque candidate payload
        candidate: serde_json::Value,
        /// Id of the sending client
        from: String,
    },
    /// Relayed chat payload
    ChatMessage {
        /// The chat text
        message: String,
        /// Id of the sending client
        from: String,
    },
    /// The other participant left or disconnected
    PeerDisconnected,
    /// Broadcast on every connect/disconnect
    OnlineCount {
        /// Number of currently connected clients
        count: usize,
    },
}

impl ServerEvent {
    /// Serialize the event to its wire representation.
    pub fn to_json(&self) -> String {
        // Serializing a ServerEvent cannot fail: every payload is already a
        // serde_json::Value or a plain field.
        serde_json::to_string(self).unwrap()
    }
}
