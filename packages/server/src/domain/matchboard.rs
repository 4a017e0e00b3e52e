//! The matchboard: registry, waiting queue and session directory.
//!
//! All pairing state is owned by one aggregate so that a whole state
//! transition (e.g. "find a match, evict both waiting entries, create the
//! session") is a single method call on `&mut self`. The async world reaches
//! this type only through
//! [`MatchboardRepository`](super::MatchboardRepository), whose in-memory
//! implementation holds the aggregate behind a single mutex.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use super::{ChatMode, Client, ClientId, DomainError, Interests, Timestamp};

/// Opaque session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RoomId(String);

impl RoomId {
    /// Create a RoomId from an existing string
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyRoomId`] if the string is empty.
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::EmptyRoomId);
        }
        Ok(Self(id))
    }

    /// Get the id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Factory for server-allocated room ids
pub struct RoomIdFactory;

impl RoomIdFactory {
    /// Allocate a fresh, unique room id
    pub fn generate() -> RoomId {
        RoomId(Uuid::new_v4().to_string())
    }
}

/// A client currently seeking a partner
#[derive(Debug, Clone, Serialize)]
pub struct WaitingEntry {
    /// Id of the waiting client
    pub client_id: ClientId,
    /// Interests stated in the find-peer request
    pub interests: Interests,
    /// Mode stated in the find-peer request
    pub mode: ChatMode,
    /// When the entry was enqueued
    pub enqueued_at: Timestamp,
}

/// A pairing of exactly two distinct clients
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    /// Session identifier
    pub room_id: RoomId,
    /// The client whose find-peer request created the session
    pub participant_a: ClientId,
    /// The waiting client that was matched
    pub participant_b: ClientId,
    /// When the session was created
    pub created_at: Timestamp,
}

impl Session {
    /// The other participant of the session, if `client_id` is a member
    pub fn peer_of(&self, client_id: &ClientId) -> Option<&ClientId> {
        if &self.participant_a == client_id {
            Some(&self.participant_b)
        } else if &self.participant_b == client_id {
            Some(&self.participant_a)
        } else {
            None
        }
    }
}

/// Where a registered client currently stands in the pairing lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientStatus {
    /// Connected, not searching
    Idle,
    /// Enqueued, waiting for a match
    Waiting,
    /// Member of an active session
    Paired,
}

/// Result of a find-peer state transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    /// A waiting entry matched; the session has been created
    Paired {
        /// Id of the freshly created session
        room_id: RoomId,
        /// The matched partner
        peer_id: ClientId,
    },
    /// No qualifying entry; the requester is (still) waiting
    Waiting,
    /// The request was dropped (requester already paired or not registered)
    Ignored,
}

/// What the disconnect transition actually did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisconnectCleanup {
    /// Whether the client was still registered (false on a repeated call)
    pub was_registered: bool,
    /// Peer that must receive `peer-disconnected`, if a session was destroyed
    pub peer_to_notify: Option<ClientId>,
    /// Online count after the cleanup
    pub online_count: usize,
}

/// Registry + matchmaking queue + session directory in one ownership root.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Matchboard {
    /// Registered clients, canonical client state
    clients: HashMap<ClientId, Client>,
    /// Waiting entries in FIFO insertion order
    waiting: Vec<WaitingEntry>,
    /// Client id → id of the session the client is in
    client_sessions: HashMap<ClientId, RoomId>,
    /// Room id → session record
    sessions: HashMap<RoomId, Session>,
    /// Online counter; always equals `clients.len()`
    online_count: usize,
}

impl Matchboard {
    /// Create an empty matchboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a freshly connected client and return the new online count.
    ///
    /// Ids are factory-allocated, so a collision means the client is already
    /// registered; the call is then a no-op.
    pub fn register(&mut self, client_id: ClientId, connected_at: Timestamp) -> usize {
        if self.clients.contains_key(&client_id) {
            return self.online_count;
        }
        self.clients
            .insert(client_id.clone(), Client::new(client_id, connected_at));
        self.online_count += 1;
        self.online_count
    }

    /// Remove a client record and decrement the counter.
    ///
    /// Returns `false` if the client was not registered (double-unregister);
    /// the counter is left untouched in that case and can never go negative.
    pub fn unregister(&mut self, client_id: &ClientId) -> bool {
        if self.clients.remove(client_id).is_some() {
            self.online_count = self.online_count.saturating_sub(1);
            true
        } else {
            false
        }
    }

    /// Current online count
    pub fn online_count(&self) -> usize {
        self.online_count
    }

    /// Number of clients waiting for a match
    pub fn waiting_count(&self) -> usize {
        self.waiting.len()
    }

    /// Number of active sessions
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Ids of all registered clients (broadcast targets)
    pub fn client_ids(&self) -> Vec<ClientId> {
        self.clients.keys().cloned().collect()
    }

    /// Canonical record of a registered client
    pub fn client(&self, client_id: &ClientId) -> Option<&Client> {
        self.clients.get(client_id)
    }

    /// Waiting entries in FIFO insertion order
    pub fn waiting_entries(&self) -> &[WaitingEntry] {
        &self.waiting
    }

    /// Session record by room id
    pub fn session(&self, room_id: &RoomId) -> Option<&Session> {
        self.sessions.get(room_id)
    }

    /// Lifecycle status of a client
    pub fn status_of(&self, client_id: &ClientId) -> ClientStatus {
        if self.client_sessions.contains_key(client_id) {
            ClientStatus::Paired
        } else if self.waiting.iter().any(|e| &e.client_id == client_id) {
            ClientStatus::Waiting
        } else {
            ClientStatus::Idle
        }
    }

    /// The other participant of the client's session, if any
    pub fn peer_of(&self, client_id: &ClientId) -> Option<ClientId> {
        let room_id = self.client_sessions.get(client_id)?;
        let session = self.sessions.get(room_id)?;
        session.peer_of(client_id).cloned()
    }

    /// Id of the session the client is in, if any
    pub fn session_of(&self, client_id: &ClientId) -> Option<RoomId> {
        self.client_sessions.get(client_id).cloned()
    }

    /// Attempt to pair the requester with a waiting client.
    ///
    /// This is one indivisible step: scanning the queue, evicting the matched
    /// entry (and the requester's own stale entry, if any) and creating the
    /// session all happen on the same `&mut self` borrow, so no other
    /// matchmaking attempt can observe an intermediate state.
    ///
    /// The queue is scanned in FIFO insertion order and the first entry wins
    /// that has the same mode AND (the requester's interests are empty OR
    /// share at least one token with the entry's interests). The interest
    /// check is intentionally one-directional: the waiting entry's interests
    /// are never tested against the requester's.
    pub fn find_peer(
        &mut self,
        requester: &ClientId,
        interests: Interests,
        mode: ChatMode,
        now: Timestamp,
    ) -> MatchOutcome {
        if !self.clients.contains_key(requester) {
            return MatchOutcome::Ignored;
        }
        if self.client_sessions.contains_key(requester) {
            return MatchOutcome::Ignored;
        }

        // The registry record stays canonical for the latest search criteria.
        if let Some(client) = self.clients.get_mut(requester) {
            client.interests = interests.clone();
            client.mode = Some(mode);
        }

        let found = self.waiting.iter().position(|entry| {
            entry.client_id != *requester
                && entry.mode == mode
                && (interests.is_empty() || interests.intersects(&entry.interests))
        });
        let matched = found.map(|index| self.waiting.remove(index));

        match matched {
            Some(entry) => {
                self.remove_waiting(requester);
                let room_id = self.create_session(requester.clone(), entry.client_id.clone(), now);
                MatchOutcome::Paired {
                    room_id,
                    peer_id: entry.client_id,
                }
            }
            None => {
                // Silently keeps the existing entry (and its position in the
                // queue) if the client is already waiting.
                self.enqueue(requester.clone(), interests, mode, now);
                MatchOutcome::Waiting
            }
        }
    }

    /// Append a waiting entry.
    ///
    /// Returns `false` without touching the queue if the client already has
    /// an entry or is in a session.
    pub fn enqueue(
        &mut self,
        client_id: ClientId,
        interests: Interests,
        mode: ChatMode,
        enqueued_at: Timestamp,
    ) -> bool {
        if self.client_sessions.contains_key(&client_id) {
            return false;
        }
        if self.waiting.iter().any(|e| e.client_id == client_id) {
            return false;
        }
        self.waiting.push(WaitingEntry {
            client_id,
            interests,
            mode,
            enqueued_at,
        });
        true
    }

    /// Delete the waiting entry for a client, if present
    pub fn remove_waiting(&mut self, client_id: &ClientId) -> bool {
        let before = self.waiting.len();
        self.waiting.retain(|e| &e.client_id != client_id);
        self.waiting.len() != before
    }

    /// Destroy the session the client is in, removing the mapping for both
    /// participants. Returns the other participant.
    ///
    /// Idempotent: destroying an already-absent session returns `None`.
    pub fn destroy_session(&mut self, client_id: &ClientId) -> Option<ClientId> {
        let room_id = self.client_sessions.remove(client_id)?;
        let session = self.sessions.remove(&room_id)?;
        let peer = session.peer_of(client_id)?.clone();
        self.client_sessions.remove(&peer);
        Some(peer)
    }

    /// Voluntary leave: destroy the client's session if paired, otherwise
    /// drop its waiting entry. Returns the peer to notify, if any.
    pub fn leave(&mut self, client_id: &ClientId) -> Option<ClientId> {
        match self.destroy_session(client_id) {
            Some(peer) => Some(peer),
            None => {
                self.remove_waiting(client_id);
                None
            }
        }
    }

    /// Full connection-drop cleanup as one indivisible step: session
    /// destruction, queue eviction and unregistration.
    ///
    /// Safe to invoke more than once per client; only the first call mutates
    /// state.
    pub fn disconnect(&mut self, client_id: &ClientId) -> DisconnectCleanup {
        let peer_to_notify = self.destroy_session(client_id);
        self.remove_waiting(client_id);
        let was_registered = self.unregister(client_id);
        DisconnectCleanup {
            was_registered,
            peer_to_notify,
            online_count: self.online_count,
        }
    }

    fn create_session(&mut self, participant_a: ClientId, participant_b: ClientId, now: Timestamp) -> RoomId {
        let room_id = RoomIdFactory::generate();
        self.client_sessions
            .insert(participant_a.clone(), room_id.clone());
        self.client_sessions
            .insert(participant_b.clone(), room_id.clone());
        self.sessions.insert(
            room_id.clone(),
            Session {
                room_id: room_id.clone(),
                participant_a,
                participant_b,
                created_at: now,
            },
        );
        room_id
    }
}

#[cfg(test)]
impl Matchboard {
    /// Assert the structural invariants of the aggregate.
    fn assert_invariants(&self) {
        // Online counter equals the number of registered clients.
        assert_eq!(self.online_count, self.clients.len());

        for (room_id, session) in &self.sessions {
            // Participants are distinct and both map back to this session.
            assert_ne!(session.participant_a, session.participant_b);
            assert_eq!(self.client_sessions.get(&session.participant_a), Some(room_id));
            assert_eq!(self.client_sessions.get(&session.participant_b), Some(room_id));
        }

        for entry in &self.waiting {
            // Never simultaneously waiting and paired.
            assert!(!self.client_sessions.contains_key(&entry.client_id));
        }
    }
}
