//! UseCase: クライアント切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//! - 切断時のクリーンアップ（セッション破棄、待機列からの削除、登録解除）
//!
//! ### なぜこのテストが必要か
//! - 切断パスはどの状態からでも到達し、冪等でなければならない
//! - セッション中の切断で相手に通知対象が返されることを保証
//! - 二重切断（レース）で状態が変わるのは1回目のみであることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: Idle / Waiting / Paired 各状態からの切断
//! - 異常系: 同一クライアントの二重切断

use std::sync::Arc;

use crate::domain::{
    ClientId, DisconnectCleanup, MatchboardRepository, MessagePushError, MessagePusher,
};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchboardRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    /// 新しい DisconnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn MatchboardRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// クライアント切断を実行
    ///
    /// セッション破棄・待機列からの削除・登録解除を Repository の単一
    /// ステップとして実行し、その結果を返します。2回目以降の呼び出しは
    /// `was_registered == false` の完全な no-op になります。
    ///
    /// # Arguments
    ///
    /// * `client_id` - 切断するクライアントの ID
    pub async fn execute(&self, client_id: ClientId) -> DisconnectCleanup {
        let cleanup = self.repository.disconnect(&client_id).await;

        if cleanup.was_registered {
            self.message_pusher.unregister_client(&client_id).await;
        } else {
            tracing::warn!(
                "Disconnect for unknown client '{}' ignored (already cleaned up)",
                client_id.as_str()
            );
        }

        cleanup
    }

    /// 残された側のピアに通知を送信
    ///
    /// # Arguments
    ///
    /// * `peer_id` - 通知対象のピア
    /// * `message` - 送信するメッセージ（JSON）
    pub async fn notify_peer(
        &self,
        peer_id: &ClientId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(peer_id, message).await
    }

    /// 接続中の全クライアントにメッセージをブロードキャスト
    pub async fn broadcast_to_all(&self, message: &str) -> Result<(), String> {
        let targets = self.repository.client_ids().await;
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
