//! Matchmaking and WebRTC signaling server library.
//!
//! This library pairs anonymous clients for 1-on-1 text or video chat and
//! relays the WebSocket handshake messages (offer / answer / ICE candidate)
//! and chat payloads between the two members of a session.

// layers
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
