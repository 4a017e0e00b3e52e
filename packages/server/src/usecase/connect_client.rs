//! UseCase: クライアント接続処理
//!
//! クライアント ID の割り当て、Matchboard への登録、送信チャンネルの登録を
//! 行います。オンライン数のブロードキャストは UI 層が生成した JSON を
//! `broadcast_to_all` 経由で配信します。

use std::sync::Arc;

use musubi_shared::time::Clock;

use crate::domain::{
    ClientId, ClientIdFactory, MatchboardRepository, MessagePusher, PusherChannel, Timestamp,
};

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchboardRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl ConnectClientUseCase {
    /// 新しい ConnectClientUseCase を作成
    pub fn new(
        repository: Arc<dyn MatchboardRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// クライアント接続を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - クライアントへのメッセージ送信用チャンネル（有界）
    ///
    /// # Returns
    ///
    /// 割り当てられたクライアント ID と、登録後のオンライン数
    pub async fn execute(&self, sender: PusherChannel) -> (ClientId, usize) {
        // 1. サーバー側でクライアント ID を割り当て
        let client_id = ClientIdFactory::generate();
        let connected_at = Timestamp::new(self.clock.now_millis());

        // 2. Matchboard に登録
        let online_count = self
            .repository
            .register(client_id.clone(), connected_at)
            .await;

        // 3. MessagePusher にクライアントを登録
        self.message_pusher
            .register_client(client_id.clone(), sender)
            .await;

        (client_id, online_count)
    }

    /// 接続中の全クライアントにメッセージをブロードキャスト
    ///
    /// # Arguments
    ///
    /// * `message` - ブロードキャストするメッセージ（JSON）
    pub async fn broadcast_to_all(&self, message: &str) -> Result<(), String> {
        let targets = self.repository.client_ids().await;
        self.message_pusher
            .broadcast(targets, message)
            .await
            .map_err(|e| e.to_string())
    }
}
