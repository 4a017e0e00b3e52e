//! WebSocket connection handler.
//!
//! One connection is served by two tasks: a receive task that parses inbound
//! events and hands them to the dispatcher, and a pusher loop that drains the
//! client's bounded outbound queue into the socket. When either task ends,
//! the other is aborted and the disconnect path runs exactly once.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::infrastructure::dto::websocket::{ClientEvent, ServerEvent};

use super::super::state::AppState;

/// Capacity of the per-client outbound queue. A slow consumer whose queue
/// fills up loses messages instead of stalling the rest of the service.
const OUTBOUND_QUEUE_CAPACITY: usize = 256;

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them
/// to the WebSocket sender.
///
/// This handles the outbound message flow: events addressed to this client
/// (relayed signals, notifications, broadcasts) are sent to its WebSocket
/// connection.
fn pusher_loop(
    mut rx: mpsc::Receiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            // Send the message to this client
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (sender, mut receiver) = socket.split();

    // Create the bounded outbound channel for this client and register it.
    let (tx, rx) = mpsc::channel(OUTBOUND_QUEUE_CAPACITY);
    let (client_id, online_count) = state.connect_client_usecase.execute(tx).await;
    tracing::info!(
        "Client '{}' connected ({} online)",
        client_id.as_str(),
        online_count
    );

    // Broadcast the new online count to every connected client, the newly
    // connected one included.
    let count_json = ServerEvent::OnlineCount {
        count: online_count,
    }
    .to_json();
    if let Err(e) = state.connect_client_usecase.broadcast_to_all(&count_json).await {
        tracing::warn!("Failed to broadcast online-count: {}", e);
    }

    let client_id_clone = client_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive events from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::error!("WebSocket error: {}", e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    // Validate at the boundary; malformed events are dropped
                    // without tearing down the connection.
                    match serde_json::from_str::<ClientEvent>(&text) {
                        Ok(event) => {
                            state_clone
                                .dispatcher
                                .dispatch(&client_id_clone, event)
                                .await;
                        }
                        Err(e) => {
                            tracing::warn!(
                                "Dropping malformed event from '{}': {}",
                                client_id_clone.as_str(),
                                e
                            );
                        }
                    }
                }
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone.as_str());
                    break;
                }
                _ => {}
            }
        }
    });

    // Spawn a task to receive messages from other clients and send to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect path: session destruction, queue eviction, unregistration.
    // Runs exactly once per connection; the cleanup itself is idempotent.
    let cleanup = state.disconnect_client_usecase.execute(client_id.clone()).await;

    if let Some(peer_id) = &cleanup.peer_to_notify {
        let message = ServerEvent::PeerDisconnected.to_json();
        if let Err(e) = state
            .disconnect_client_usecase
            .notify_peer(peer_id, &message)
            .await
        {
            tracing::warn!(
                "Failed to send peer-disconnected to '{}': {}",
                peer_id.as_str(),
                e
            );
        }
    }

    if cleanup.was_registered {
        tracing::info!(
            "Client '{}' disconnected ({} online)",
            client_id.as_str(),
            cleanup.online_count
        );
        let count_json = ServerEvent::OnlineCount {
            count: cleanup.online_count,
        }
        .to_json();
        if let Err(e) = state
            .disconnect_client_usecase
            .broadcast_to_all(&count_json)
            .await
        {
            tracing::warn!("Failed to broadcast online-count: {}", e);
        }
    }
}
