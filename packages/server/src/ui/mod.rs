//! UI layer: WebSocket/HTTP endpoints and the server runtime.

mod dispatcher;
mod handler;
mod server;
mod signal;
mod state;

pub use dispatcher::Dispatcher;
pub use server::Server;
pub use state::AppState;
