//! Server state shared across connection handlers.

use std::sync::Arc;

use crate::usecase::{ConnectClientUseCase, DisconnectClientUseCase, GetStatsUseCase};

use super::dispatcher::Dispatcher;

/// Shared application state
pub struct AppState {
    /// ConnectClientUseCase（クライアント接続のユースケース）
    pub connect_client_usecase: Arc<ConnectClientUseCase>,
    /// DisconnectClientUseCase（クライアント切断のユースケース）
    pub disconnect_client_usecase: Arc<DisconnectClientUseCase>,
    /// Dispatcher（受信イベントのディスパッチャ）
    pub dispatcher: Arc<Dispatcher>,
    /// GetStatsUseCase（サービス統計取得のユースケース）
    pub get_stats_usecase: Arc<GetStatsUseCase>,
}
