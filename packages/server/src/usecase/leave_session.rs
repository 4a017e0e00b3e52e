//! UseCase: セッション離脱処理（disconnect-peer）
//!
//! 接続を維持したままセッションだけを離脱する処理です。待機中であれば
//! 待機エントリのみが削除されます。

use std::sync::Arc;

use crate::domain::{ClientId, MatchboardRepository, MessagePushError, MessagePusher};

/// セッション離脱のユースケース
pub struct LeaveSessionUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchboardRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl LeaveSessionUseCase {
    /// 新しい LeaveSessionUseCase を作成
    pub fn new(
        repository: Arc<dyn MatchboardRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// セッション離脱を実行
    ///
    /// # Returns
    ///
    /// セッションが破棄された場合、`peer-disconnected` を通知すべき相手の ID
    pub async fn execute(&self, client_id: ClientId) -> Option<ClientId> {
        let peer = self.repository.leave(&client_id).await;

        match &peer {
            Some(peer_id) => {
                tracing::info!(
                    "Client '{}' left its session with '{}'",
                    client_id.as_str(),
                    peer_id.as_str()
                );
            }
            None => {
                tracing::debug!(
                    "Client '{}' had no session to leave",
                    client_id.as_str()
                );
            }
        }

        peer
    }

    /// 残された側のピアに通知を送信
    pub async fn notify_peer(
        &self,
        peer_id: &ClientId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(peer_id, message).await
    }
}
