//! Domain model for the matchmaking and signaling service.
//!
//! The domain layer is pure: it has no knowledge of WebSocket, HTTP or any
//! other transport. All pairing state lives in the [`Matchboard`] aggregate,
//! and the interfaces the domain needs from the outside world are defined
//! here as traits (dependency inversion).

mod client;
mod error;
mod matchboard;
mod message_pusher;
mod repository;
mod signal;

pub use client::{ChatMode, Client, ClientId, ClientIdFactory, Interests, Timestamp};
pub use error::DomainError;
pub use matchboard::{
    ClientStatus, DisconnectCleanup, MatchOutcome, Matchboard, RoomId, RoomIdFactory, Session,
    WaitingEntry,
};
pub use message_pusher::{MessagePushError, MessagePusher, PusherChannel};
#[cfg(test)]
pub use message_pusher::MockMessagePusher;
pub use repository::MatchboardRepository;
pub use signal::SignalKind;
