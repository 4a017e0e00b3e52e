//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::usecase::{ConnectClientUseCase, DisconnectClientUseCase, GetStatsUseCase};

use super::{
    dispatcher::Dispatcher,
    handler::{debug_matchboard, get_stats, health_check, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Matchmaking and signaling server
///
/// This struct encapsulates the server configuration and provides methods to
/// run the server.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(
///     connect_client_usecase,
///     disconnect_client_usecase,
///     dispatcher,
///     get_stats_usecase,
/// );
/// server.run("127.0.0.1".to_string(), 3001).await?;
/// ```
pub struct Server {
    /// Shared application state handed to every handler
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `connect_client_usecase` - UseCase for client connection
    /// * `disconnect_client_usecase` - UseCase for client disconnection
    /// * `dispatcher` - Dispatcher routing inbound events
    /// * `get_stats_usecase` - UseCase for service statistics
    pub fn new(
        connect_client_usecase: Arc<ConnectClientUseCase>,
        disconnect_client_usecase: Arc<DisconnectClientUseCase>,
        dispatcher: Arc<Dispatcher>,
        get_stats_usecase: Arc<GetStatsUseCase>,
    ) -> Self {
        Self {
            state: Arc::new(AppState {
                connect_client_usecase,
                disconnect_client_usecase,
                dispatcher,
                get_stats_usecase,
            }),
        }
    }

    /// Build the Axum router serving the WebSocket and HTTP endpoints.
    pub fn router(&self) -> Router {
        Router::new()
            .route("/ws", get(websocket_handler))
            .route("/api/health", get(health_check))
            .route("/api/stats", get(get_stats))
            .route("/debug/matchboard", get(debug_matchboard))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Run the matchmaking and signaling server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 3001)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address
    /// or if there's an error during server execution.
    pub async fn run(&self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        let bind_addr = format!("{}:{}", host, port);
        let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

        tracing::info!(
            "Matchmaking and signaling server listening on {}",
            listener.local_addr()?
        );
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}
