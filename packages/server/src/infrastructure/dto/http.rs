//! HTTP API response DTOs.

use serde::Serialize;

/// Response body of `GET /api/stats`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceStatsDto {
    /// Number of currently connected clients
    pub online: usize,
    /// Number of clients waiting for a match
    pub waiting: usize,
    /// Number of active sessions
    pub sessions: usize,
}
