//! Inbound event dispatcher.
//!
//! The dispatcher receives validated [`ClientEvent`]s from the per-connection
//! receive task and routes them to the use cases in a fixed order. Connection
//! lifecycle (connect / connection drop) is transport-level and handled by
//! the WebSocket handler itself, not here.
//!
//! Events that are invalid in the client's current state (a find-peer while
//! paired, a relay while idle) are dropped silently: these are expected
//! races in a multi-party system, never fatal errors.

use std::sync::Arc;

use crate::{
    domain::{ChatMode, ClientId, Interests, MatchOutcome, SignalKind},
    infrastructure::dto::{
        conversion::interests_from_wire,
        websocket::{ClientEvent, ServerEvent},
    },
    usecase::{FindPeerUseCase, LeaveSessionUseCase, RelaySignalUseCase},
};

/// Routes inbound client events to the matching use case.
pub struct Dispatcher {
    /// FindPeerUseCase（ピア探索のユースケース）
    find_peer_usecase: Arc<FindPeerUseCase>,
    /// RelaySignalUseCase（シグナリング中継のユースケース）
    relay_signal_usecase: Arc<RelaySignalUseCase>,
    /// LeaveSessionUseCase（セッション離脱のユースケース）
    leave_session_usecase: Arc<LeaveSessionUseCase>,
}

impl Dispatcher {
    /// Create a new Dispatcher
    pub fn new(
        find_peer_usecase: Arc<FindPeerUseCase>,
        relay_signal_usecase: Arc<RelaySignalUseCase>,
        leave_session_usecase: Arc<LeaveSessionUseCase>,
    ) -> Self {
        Self {
            find_peer_usecase,
            relay_signal_usecase,
            leave_session_usecase,
        }
    }

    /// Route one inbound event.
    pub async fn dispatch(&self, client_id: &ClientId, event: ClientEvent) {
        match event {
            ClientEvent::FindPeer { interests, mode } => {
                self.handle_find_peer(client_id, interests_from_wire(interests), mode.into())
                    .await;
            }
            ClientEvent::Offer { offer } => {
                let event = ServerEvent::Offer {
                    offer,
                    from: client_id.as_str().to_string(),
                };
                self.relay(client_id, SignalKind::Offer, event).await;
            }
            ClientEvent::Answer { answer } => {
                let event = ServerEvent::Answer {
                    answer,
                    from: client_id.as_str().to_string(),
                };
                self.relay(client_id, SignalKind::Answer, event).await;
            }
            ClientEvent::IceCandidate { candidate } => {
                let event = ServerEvent::IceCandidate {
                    candidate,
                    from: client_id.as_str().to_string(),
                };
                self.relay(client_id, SignalKind::IceCandidate, event).await;
            }
            ClientEvent::ChatMessage { message } => {
                let event = ServerEvent::ChatMessage {
                    message,
                    from: client_id.as_str().to_string(),
                };
                self.relay(client_id, SignalKind::ChatMessage, event).await;
            }
            ClientEvent::DisconnectPeer => {
                self.handle_disconnect_peer(client_id).await;
            }
        }
    }

    async fn handle_find_peer(&self, client_id: &ClientId, interests: Interests, mode: ChatMode) {
        match self
            .find_peer_usecase
            .execute(client_id.clone(), interests, mode)
            .await
        {
            MatchOutcome::Paired { room_id, peer_id } => {
                // Both sides learn the same room id and each other's id.
                let to_requester = ServerEvent::PeerFound {
                    room_id: room_id.as_str().to_string(),
                    peer_id: peer_id.as_str().to_string(),
                }
                .to_json();
                let to_peer = ServerEvent::PeerFound {
                    room_id: room_id.as_str().to_string(),
                    peer_id: client_id.as_str().to_string(),
                }
                .to_json();

                if let Err(e) = self.find_peer_usecase.notify(client_id, &to_requester).await {
                    tracing::warn!(
                        "Failed to send peer-found to '{}': {}",
                        client_id.as_str(),
                        e
                    );
                }
                if let Err(e) = self.find_peer_usecase.notify(&peer_id, &to_peer).await {
                    tracing::warn!(
                        "Failed to send peer-found to '{}': {}",
                        peer_id.as_str(),
                        e
                    );
                }
            }
            MatchOutcome::Waiting => {
                let message = ServerEvent::WaitingForPeer.to_json();
                if let Err(e) = self.find_peer_usecase.notify(client_id, &message).await {
                    tracing::warn!(
                        "Failed to send waiting-for-peer to '{}': {}",
                        client_id.as_str(),
                        e
                    );
                }
            }
            MatchOutcome::Ignored => {}
        }
    }

    async fn handle_disconnect_peer(&self, client_id: &ClientId) {
        if let Some(peer_id) = self.leave_session_usecase.execute(client_id.clone()).await {
            let message = ServerEvent::PeerDisconnected.to_json();
            if let Err(e) = self
                .leave_session_usecase
                .notify_peer(&peer_id, &message)
                .await
            {
                tracing::warn!(
                    "Failed to send peer-disconnected to '{}': {}",
                    peer_id.as_str(),
                    e
                );
            }
        }
    }

    async fn relay(&self, from: &ClientId, kind: SignalKind, event: ServerEvent) {
        let json_message = event.to_json();
        self.relay_signal_usecase
            .execute(from.clone(), kind, json_message)
            .await;
    }
}
