//! Repository trait 定義
//!
//! ドメイン層が必要とする Matchboard へのアクセスインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! ## 並行性の規律
//!
//! Matchboard への全ての変更はこの trait を経由します。実装は1つの状態遷移
//! （例: 探索・待機列からの除去・セッション作成）を単一のロック取得の中で
//! 実行しなければなりません。部分的な中間状態が他のマッチング試行から
//! 観測されることは許されません。

use async_trait::async_trait;

use super::{
    ChatMode, ClientId, DisconnectCleanup, Interests, MatchOutcome, Matchboard, Timestamp,
};

/// Matchboard Repository trait
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait MatchboardRepository: Send + Sync {
    /// クライアントを登録し、登録後のオンライン数を返す
    async fn register(&self, client_id: ClientId, connected_at: Timestamp) -> usize;

    /// マッチングを試行する（探索・待機列からの除去・セッション作成を単一ステップで実行）
    async fn find_peer(
        &self,
        requester: ClientId,
        interests: Interests,
        mode: ChatMode,
        now: Timestamp,
    ) -> MatchOutcome;

    /// 現在のセッションから離脱し、通知対象のピアを返す（待機中なら待機エントリを削除）
    async fn leave(&self, client_id: &ClientId) -> Option<ClientId>;

    /// 相手のクライアント ID を取得（セッションが無ければ None）
    async fn peer_of(&self, client_id: &ClientId) -> Option<ClientId>;

    /// 切断時のクリーンアップを単一ステップで実行（冪等）
    async fn disconnect(&self, client_id: &ClientId) -> DisconnectCleanup;

    /// 接続中の全てのクライアント ID を取得（ブロードキャスト対象）
    async fn client_ids(&self) -> Vec<ClientId>;

    /// 現在のオンライン数を取得
    async fn online_count(&self) -> usize;

    /// Matchboard 全体のスナップショットを取得
    async fn snapshot(&self) -> Matchboard;
}
