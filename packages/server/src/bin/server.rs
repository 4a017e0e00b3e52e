//! Matchmaking and WebRTC signaling server for anonymous 1-on-1 chat.
//!
//! Pairs waiting clients by mode and interests, then relays the WebRTC
//! handshake (offer / answer / ICE candidate) and chat messages between the
//! two members of each session.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin musubi-server
//! cargo run --bin musubi-server -- --host 0.0.0.0 --port 3001
//! ```

use std::{collections::HashMap, sync::Arc};

use clap::Parser;
use musubi_server::{
    domain::Matchboard,
    infrastructure::{
        message_pusher::WebSocketMessagePusher, repository::InMemoryMatchboardRepository,
    },
    ui::{Dispatcher, Server},
    usecase::{
        ConnectClientUseCase, DisconnectClientUseCase, FindPeerUseCase, GetStatsUseCase,
        LeaveSessionUseCase, RelaySignalUseCase,
    },
};
use musubi_shared::{logger::setup_logger, time::SystemClock};
use tokio::sync::Mutex;

#[derive(Parser, Debug)]
#[command(name = "musubi-server")]
#[command(about = "Matchmaking and WebRTC signaling server", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "3001")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Repository
    // 2. MessagePusher
    // 3. UseCases + Dispatcher
    // 4. Server

    // 1. Create Repository (in-memory matchboard behind a single mutex)
    let matchboard = Arc::new(Mutex::new(Matchboard::new()));
    let repository = Arc::new(InMemoryMatchboardRepository::new(matchboard));

    // 2. Create MessagePusher (WebSocket implementation)
    let pusher_clients = Arc::new(Mutex::new(HashMap::new()));
    let message_pusher = Arc::new(WebSocketMessagePusher::new(pusher_clients));

    // 3. Create UseCases and the Dispatcher
    let clock = Arc::new(SystemClock);
    let connect_client_usecase = Arc::new(ConnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock.clone(),
    ));
    let disconnect_client_usecase = Arc::new(DisconnectClientUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let find_peer_usecase = Arc::new(FindPeerUseCase::new(
        repository.clone(),
        message_pusher.clone(),
        clock,
    ));
    let relay_signal_usecase = Arc::new(RelaySignalUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let leave_session_usecase = Arc::new(LeaveSessionUseCase::new(
        repository.clone(),
        message_pusher.clone(),
    ));
    let get_stats_usecase = Arc::new(GetStatsUseCase::new(repository.clone()));
    let dispatcher = Arc::new(Dispatcher::new(
        find_peer_usecase,
        relay_signal_usecase,
        leave_session_usecase,
    ));

    // 4. Create and run the server
    let server = Server::new(
        connect_client_usecase,
        disconnect_client_usecase,
        dispatcher,
        get_stats_usecase,
    );
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
