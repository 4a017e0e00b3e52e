//! UseCase layer: one use case per state transition of the service.
//!
//! Each use case owns the collaborators it needs (repository, message
//! pusher, clock) behind `Arc<dyn Trait>` and exposes a small `execute`
//! method plus notification helpers. The WebSocket/HTTP handlers never touch
//! the repository directly.

mod connect_client;
mod disconnect_client;
mod find_peer;
mod get_stats;
mod leave_session;
mod relay_signal;

pub use connect_client::ConnectClientUseCase;
pub use disconnect_client::DisconnectClientUseCase;
pub use find_peer::FindPeerUseCase;
pub use get_stats::{GetStatsUseCase, ServiceStats};
pub use leave_session::LeaveSessionUseCase;
pub use relay_signal::RelaySignalUseCase;
