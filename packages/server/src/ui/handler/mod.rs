//! Endpoint handlers.

mod http;
mod websocket;

pub use http::{debug_matchboard, get_stats, health_check};
pub use websocket::websocket_handler;
