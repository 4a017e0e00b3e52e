//! MessagePusher trait 定義
//!
//! ドメイン層が必要とするメッセージ送信のインターフェースを定義します。
//! 具体的な実装（WebSocket など）は Infrastructure 層が提供します。
//!
//! 送信チャンネルは有界です。遅いクライアントの送信キューが満杯になった
//! 場合、メッセージは破棄されます（at-most-once、ベストエフォート配信）。

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc;

use super::ClientId;

/// クライアントへの送信チャンネル（有界）
pub type PusherChannel = mpsc::Sender<String>;

/// メッセージ送信時のエラー
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessagePushError {
    /// 対象クライアントが登録されていない
    #[error("client '{0}' not found")]
    ClientNotFound(String),

    /// 送信キューが満杯（遅いクライアント）
    #[error("outbound queue full for client '{0}'")]
    QueueFull(String),

    /// 送信チャンネルが閉じられている（切断直後のレース）
    #[error("outbound channel closed for client '{0}'")]
    ChannelClosed(String),
}

/// MessagePusher trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// クライアントの送信チャンネルを登録
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel);

    /// クライアントの送信チャンネルを登録解除
    async fn unregister_client(&self, client_id: &ClientId);

    /// 特定のクライアントにメッセージを送信
    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError>;

    /// 複数のクライアントにメッセージをブロードキャスト（部分失敗を許容）
    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        content: &str,
    ) -> Result<(), MessagePushError>;
}
