//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - WebSocket の有界 `Sender` を管理
//! - クライアントへのメッセージ送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`src/ui/handler/websocket.rs`）で行われます。
//! この実装は生成された `Sender` を受け取り、メッセージ送信に使用します。
//!
//! 送信には `try_send` を使用します。遅いクライアントのキューが満杯でも
//! ここでブロックせず、メッセージを破棄して警告ログを残します。これに
//! より、1つの遅いクライアントが他のクライアントのマッチングや中継を
//! 停滞させることはありません。

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc::error::TrySendError};

use crate::domain::{ClientId, MessagePushError, MessagePusher, PusherChannel};

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信チャンネル
    ///
    /// Key: ClientId
    /// Value: PusherChannel（有界）
    clients: Arc<Mutex<HashMap<ClientId, PusherChannel>>>,
}

impl WebSocketMessagePusher {
    /// 新しい WebSocketMessagePusher を作成
    pub fn new(clients: Arc<Mutex<HashMap<ClientId, PusherChannel>>>) -> Self {
        Self { clients }
    }

    fn try_push(sender: &PusherChannel, client_id: &ClientId, content: &str) -> Result<(), MessagePushError> {
        match sender.try_send(content.to_string()) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => Err(MessagePushError::QueueFull(
                client_id.as_str().to_string(),
            )),
            Err(TrySendError::Closed(_)) => Err(MessagePushError::ChannelClosed(
                client_id.as_str().to_string(),
            )),
        }
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, client_id: ClientId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        clients.insert(client_id.clone(), sender);
        tracing::debug!(
            "Client '{}' registered to MessagePusher",
            client_id.as_str()
        );
    }

    async fn unregister_client(&self, client_id: &ClientId) {
        let mut clients = self.clients.lock().await;
        clients.remove(client_id);
        tracing::debug!(
            "Client '{}' unregistered from MessagePusher",
            client_id.as_str()
        );
    }

    async fn push_to(&self, client_id: &ClientId, content: &str) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        if let Some(sender) = clients.get(client_id) {
            Self::try_push(sender, client_id, content)?;
            tracing::debug!("Pushed message to client '{}'", client_id.as_str());
            Ok(())
        } else {
            Err(MessagePushError::ClientNotFound(
                client_id.as_str().to_string(),
            ))
        }
    }

    async fn broadcast(
        &self,
        targets: Vec<ClientId>,
        content: &str,
    ) -> Result<(), MessagePushError> {
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = Self::try_push(sender, &target, content) {
                    tracing::warn!(
                        "Failed to push message to client '{}': {}",
                        target.as_str(),
                        e
                    );
                } else {
                    tracing::debug!("Broadcasted message to client '{}'", target.as_str());
                }
            } else {
                tracing::warn!(
                    "Client '{}' not found during broadcast, skipping",
                    target.as_str()
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ClientIdFactory;
    use tokio::sync::mpsc;

    fn create_test_pusher() -> (
        WebSocketMessagePusher,
        Arc<Mutex<HashMap<ClientId, PusherChannel>>>,
    ) {
        let clients = Arc::new(Mutex::new(HashMap::new()));
        let pusher = WebSocketMessagePusher::new(clients.clone());
        (pusher, clients)
    }

    #[tokio::test]
    async fn test_push_to_success() {
        // テスト項目: 特定のクライアントにメッセージを送信できる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::channel(8);
        let client_id = ClientIdFactory::generate();
        pusher.register_client(client_id.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&client_id, "Hello").await;

        // then (期待する結果):
        assert!(result.is_ok());
        let received = rx.recv().await;
        assert_eq!(received, Some("Hello".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_client_not_found() {
        // テスト項目: 存在しないクライアントへの送信はエラーを返す
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let client_id = ClientIdFactory::generate();

        // when (操作):
        let result = pusher.push_to(&client_id, "Hello").await;

        // then (期待する結果):
        assert!(matches!(
            result,
            Err(MessagePushError::ClientNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_push_to_full_queue_returns_queue_full() {
        // テスト項目: 送信キューが満杯の場合、メッセージは破棄されエラーが返される
        // given (前提条件): 容量1のチャンネルを満杯にしておく
        let (pusher, _clients) = create_test_pusher();
        let (tx, mut rx) = mpsc::channel(1);
        let client_id = ClientIdFactory::generate();
        pusher.register_client(client_id.clone(), tx).await;
        pusher.push_to(&client_id, "first").await.unwrap();

        // when (操作):
        let result = pusher.push_to(&client_id, "second").await;

        // then (期待する結果): QueueFull エラーになり、最初のメッセージのみ残る
        assert!(matches!(result, Err(MessagePushError::QueueFull(_))));
        assert_eq!(rx.recv().await, Some("first".to_string()));
    }

    #[tokio::test]
    async fn test_push_to_closed_channel_returns_channel_closed() {
        // テスト項目: 受信側が閉じたチャンネルへの送信はエラーを返す
        // given (前提条件): 受信側を drop したチャンネル
        let (pusher, _clients) = create_test_pusher();
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let client_id = ClientIdFactory::generate();
        pusher.register_client(client_id.clone(), tx).await;

        // when (操作):
        let result = pusher.push_to(&client_id, "Hello").await;

        // then (期待する結果):
        assert!(matches!(result, Err(MessagePushError::ChannelClosed(_))));
    }

    #[tokio::test]
    async fn test_broadcast_success() {
        // テスト項目: 複数のクライアントにメッセージをブロードキャストできる
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::channel(8);
        let (tx2, mut rx2) = mpsc::channel(8);
        let alice = ClientIdFactory::generate();
        let bob = ClientIdFactory::generate();
        pusher.register_client(alice.clone(), tx1).await;
        pusher.register_client(bob.clone(), tx2).await;

        // when (操作):
        let targets = vec![alice, bob];
        let result = pusher.broadcast(targets, "Broadcast message").await;

        // then (期待する結果):
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
        assert_eq!(rx2.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_partial_failure() {
        // テスト項目: ブロードキャスト時、一部のクライアントが存在しなくても成功する
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();
        let (tx1, mut rx1) = mpsc::channel(8);
        let alice = ClientIdFactory::generate();
        let nonexistent = ClientIdFactory::generate();
        pusher.register_client(alice.clone(), tx1).await;

        // when (操作):
        let targets = vec![alice, nonexistent];
        let result = pusher.broadcast(targets, "Broadcast message").await;

        // then (期待する結果): ブロードキャストは部分失敗を許容
        assert!(result.is_ok());
        assert_eq!(rx1.recv().await, Some("Broadcast message".to_string()));
    }

    #[tokio::test]
    async fn test_broadcast_empty_targets() {
        // テスト項目: 空のターゲットリストでもエラーにならない
        // given (前提条件):
        let (pusher, _clients) = create_test_pusher();

        // when (操作):
        let result = pusher.broadcast(vec![], "Message").await;

        // then (期待する結果):
        assert!(result.is_ok());
    }
}
