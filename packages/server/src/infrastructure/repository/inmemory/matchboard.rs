//! InMemory Matchboard Repository 実装
//!
//! ドメイン層が定義する MatchboardRepository trait の具体的な実装。
//! Matchboard 全体を単一の `tokio::sync::Mutex` で保持します。
//!
//! ## 並行性の規律
//!
//! 各メソッドはロックを1回だけ取得し、1つの状態遷移全体をその中で実行
//! します。特に `find_peer` は「探索・待機列からの除去・セッション作成」を
//! 1回のロック取得で行うため、同時に複数の探索要求が来ても同じ待機
//! クライアントが二重にマッチングされることはありません。

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    ChatMode, ClientId, DisconnectCleanup, Interests, MatchOutcome, Matchboard,
    MatchboardRepository, Timestamp,
};

/// インメモリ Matchboard Repository 実装
pub struct InMemoryMatchboardRepository {
    /// Matchboard ドメインモデル（単一のロックで保護）
    matchboard: Arc<Mutex<Matchboard>>,
}

impl InMemoryMatchboardRepository {
    /// 新しい InMemoryMatchboardRepository を作成
    pub fn new(matchboard: Arc<Mutex<Matchboard>>) -> Self {
        Self { matchboard }
    }
}

#[async_trait]
impl MatchboardRepository for InMemoryMatchboardRepository {
    async fn register(&self, client_id: ClientId, connected_at: Timestamp) -> usize {
        let mut board = self.matchboard.lock().await;
        board.register(client_id, connected_at)
    }

    async fn find_peer(
        &self,
        requester: ClientId,
        interests: Interests,
        mode: ChatMode,
        now: Timestamp,
    ) -> MatchOutcome {
        let mut board = self.matchboard.lock().await;
        board.find_peer(&requester, interests, mode, now)
    }

    async fn leave(&self, client_id: &ClientId) -> Option<ClientId> {
        let mut board = self.matchboard.lock().await;
        board.leave(client_id)
    }

    async fn peer_of(&self, client_id: &ClientId) -> Option<ClientId> {
        let board = self.matchboard.lock().await;
        board.peer_of(client_id)
    }

    async fn disconnect(&self, client_id: &ClientId) -> DisconnectCleanup {
        let mut board = self.matchboard.lock().await;
        board.disconnect(client_id)
    }

    async fn client_ids(&self) -> Vec<ClientId> {
        let board = self.matchboard.lock().await;
        board.client_ids()
    }

    async fn online_count(&self) -> usize {
        let board = self.matchboard.lock().await;
        board.online_count()
    }

    async fn snapshot(&self) -> Matchboard {
        let board = self.matchboard.lock().await;
        board.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClientIdFactory, ClientStatus};

    fn create_test_repository() -> Arc<InMemoryMatchboardRepository> {
        let matchboard = Arc::new(Mutex::new(Matchboard::new()));
        Arc::new(InMemoryMatchboardRepository::new(matchboard))
    }

    async fn register_many(repository: &InMemoryMatchboardRepository, n: usize) -> Vec<ClientId> {
        let mut ids = Vec::with_capacity(n);
        for _ in 0..n {
            let id = ClientIdFactory::generate();
            repository.register(id.clone(), Timestamp::new(0)).await;
            ids.push(id);
        }
        ids
    }

    #[tokio::test]
    async fn test_register_and_disconnect_roundtrip() {
        // テスト項目: 登録と切断でオンライン数が正しく増減する
        // given (前提条件):
        let repository = create_test_repository();

        // when (操作):
        let id = ClientIdFactory::generate();
        let count = repository.register(id.clone(), Timestamp::new(0)).await;
        let cleanup = repository.disconnect(&id).await;

        // then (期待する結果):
        assert_eq!(count, 1);
        assert!(cleanup.was_registered);
        assert_eq!(cleanup.online_count, 0);
        assert_eq!(repository.online_count().await, 0);
    }

    #[tokio::test]
    async fn test_concurrent_even_searches_produce_disjoint_sessions() {
        // テスト項目: N 並行の探索要求で floor(N/2) 個の独立したセッションができる
        // given (前提条件): 同一条件で探索する 8 クライアント
        let repository = create_test_repository();
        let ids = register_many(&repository, 8).await;

        // when (操作): 全員が同時に find_peer を実行
        let mut handles = Vec::new();
        for id in ids.clone() {
            let repo = repository.clone();
            handles.push(tokio::spawn(async move {
                repo.find_peer(id, Interests::default(), ChatMode::Text, Timestamp::new(1))
                    .await
            }));
        }
        for handle in handles {
            handle.await.expect("task should not panic");
        }

        // then (期待する結果): 4 セッション、待機 0、どのクライアントも
        // ちょうど1つのセッションに属する
        let board = repository.snapshot().await;
        assert_eq!(board.session_count(), 4);
        assert_eq!(board.waiting_count(), 0);
        for id in &ids {
            assert_eq!(board.status_of(id), ClientStatus::Paired);
        }
    }

    #[tokio::test]
    async fn test_concurrent_odd_searches_leave_exactly_one_waiting() {
        // テスト項目: N が奇数の場合、ちょうど1クライアントが待機のまま残る
        // given (前提条件): 同一条件で探索する 9 クライアント
        let repository = create_test_repository();
        let ids = register_many(&repository, 9).await;

        // when (操作):
        let mut handles = Vec::new();
        for id in ids.clone() {
            let repo = repository.clone();
            handles.push(tokio::spawn(async move {
                repo.find_peer(id, Interests::default(), ChatMode::Text, Timestamp::new(1))
                    .await
            }));
        }
        for handle in handles {
            handle.await.expect("task should not panic");
        }

        // then (期待する結果): 4 セッションと 1 待機
        let board = repository.snapshot().await;
        assert_eq!(board.session_count(), 4);
        assert_eq!(board.waiting_count(), 1);
        let paired = ids
            .iter()
            .filter(|id| board.status_of(id) == ClientStatus::Paired)
            .count();
        let waiting = ids
            .iter()
            .filter(|id| board.status_of(id) == ClientStatus::Waiting)
            .count();
        assert_eq!(paired, 8);
        assert_eq!(waiting, 1);
    }

    #[tokio::test]
    async fn test_concurrent_disconnect_and_search_keep_state_consistent() {
        // テスト項目: 切断と探索が並行しても状態の整合性が保たれる
        // given (前提条件): ペアリング済みの2クライアントと待機中の1クライアント
        let repository = create_test_repository();
        let ids = register_many(&repository, 3).await;
        repository
            .find_peer(
                ids[0].clone(),
                Interests::default(),
                ChatMode::Text,
                Timestamp::new(1),
            )
            .await;
        repository
            .find_peer(
                ids[1].clone(),
                Interests::default(),
                ChatMode::Text,
                Timestamp::new(2),
            )
            .await;

        // when (操作): ids[0] の切断と ids[2] の探索を並行実行
        let repo1 = repository.clone();
        let id0 = ids[0].clone();
        let disconnect_task = tokio::spawn(async move { repo1.disconnect(&id0).await });
        let repo2 = repository.clone();
        let id2 = ids[2].clone();
        let search_task = tokio::spawn(async move {
            repo2
                .find_peer(id2, Interests::default(), ChatMode::Text, Timestamp::new(3))
                .await
        });
        disconnect_task.await.expect("task should not panic");
        search_task.await.expect("task should not panic");

        // then (期待する結果): どちらの順序でも最終状態は同じ。
        // ids[1] はペアリング中で待機列にいないため ids[2] は必ず待機になり、
        // ids[0] の切断でセッションは破棄される。
        let board = repository.snapshot().await;
        assert_eq!(board.online_count(), 2);
        assert_eq!(board.session_count(), 0);
        assert_eq!(board.status_of(&ids[1]), ClientStatus::Idle);
        assert_eq!(board.status_of(&ids[2]), ClientStatus::Waiting);
    }
}
