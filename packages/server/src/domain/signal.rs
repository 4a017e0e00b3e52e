//! Kinds of relayed messages.

/// The four message kinds forwarded between the two members of a session.
///
/// The relay is content-agnostic: the kind is used for routing and logging
/// only, never to inspect the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalKind {
    /// WebRTC session description proposed by the caller
    Offer,
    /// WebRTC session description answering an offer
    Answer,
    /// WebRTC network candidate
    IceCandidate,
    /// Text chat payload
    ChatMessage,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalKind::Offer => write!(f, "offer"),
            SignalKind::Answer => write!(f, "answer"),
            SignalKind::IceCandidate => write!(f, "ice-candidate"),
            SignalKind::ChatMessage => write!(f, "chat-message"),
        }
    }
}
