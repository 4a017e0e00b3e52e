//! UseCase: シグナリング中継処理
//!
//! セッションの相手にメッセージをそのまま転送します。ペイロードの内容は
//! 一切検査しません（offer / answer / ICE candidate / チャット共通）。
//! セッションが存在しない場合、メッセージは黙って破棄されます。これは
//! エラーではなく、相手が直前に切断したレースとして扱います。

use std::sync::Arc;

use crate::domain::{ClientId, MatchboardRepository, MessagePusher, SignalKind};

/// シグナリング中継のユースケース
pub struct RelaySignalUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchboardRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl RelaySignalUseCase {
    /// 新しい RelaySignalUseCase を作成
    pub fn new(
        repository: Arc<dyn MatchboardRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// メッセージを相手に中継
    ///
    /// # Arguments
    ///
    /// * `from` - 送信元クライアントの ID
    /// * `kind` - メッセージ種別（ログ用途のみ）
    /// * `json_message` - 送信する JSON メッセージ（UI 層で生成済み）
    ///
    /// # Returns
    ///
    /// 配信先のピア ID。セッションが無い、または配信に失敗した場合は None
    pub async fn execute(
        &self,
        from: ClientId,
        kind: SignalKind,
        json_message: String,
    ) -> Option<ClientId> {
        let Some(peer_id) = self.repository.peer_of(&from).await else {
            tracing::debug!(
                "Dropping {} from '{}': no active session",
                kind,
                from.as_str()
            );
            return None;
        };

        if let Err(e) = self.message_pusher.push_to(&peer_id, &json_message).await {
            tracing::warn!(
                "Failed to relay {} from '{}' to '{}': {}",
                kind,
                from.as_str(),
                peer_id.as_str(),
                e
            );
            return None;
        }

        tracing::debug!(
            "Relayed {} from '{}' to '{}'",
            kind,
            from.as_str(),
            peer_id.as_str()
        );
        Some(peer_id)
    }
}
