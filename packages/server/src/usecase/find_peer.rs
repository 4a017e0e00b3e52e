//! UseCase: ピア探索処理（マッチメイキング）
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - FindPeerUseCase::execute() メソッド
//! - 探索要求に対するマッチング結果（Paired / Waiting / Ignored）
//!
//! ### なぜこのテストが必要か
//! - マッチング成立時に探索・待機列からの除去・セッション作成が
//!   1ステップで行われることを保証（check-then-act レースの防止）
//! - マッチング不成立時に探索者が待機列に追加されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系: マッチング成立、待機列への追加
//! - 異常系: セッション中のクライアントからの探索要求

use std::sync::Arc;

use musubi_shared::time::Clock;

use crate::domain::{
    ChatMode, ClientId, Interests, MatchOutcome, MatchboardRepository, MessagePushError,
    MessagePusher, Timestamp,
};

/// ピア探索のユースケース
pub struct FindPeerUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchboardRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// Clock（現在時刻の抽象化）
    clock: Arc<dyn Clock>,
}

impl FindPeerUseCase {
    /// 新しい FindPeerUseCase を作成
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

    /// ピア探索を実行
    ///
    /// # Arguments
    ///
    /// * `client_id` - 探索するクライアントの ID
    /// * `interests` - 探索条件の興味リスト（空なら誰とでもマッチング）
    /// * `mode` - 探索条件のモード（text / video）
    pub async fn execute(
        &self,
        client_id: ClientId,
        interests: Interests,
        mode: ChatMode,
    ) -> MatchOutcome {
        let now = Timestamp::new(self.clock.now_millis());
        let outcome = self
            .repository
            .find_peer(client_id.clone(), interests, mode, now)
            .await;

        match &outcome {
            MatchOutcome::Paired { room_id, peer_id } => {
                tracing::info!(
                    "Client '{}' paired with '{}' in room '{}'",
                    client_id.as_str(),
                    peer_id.as_str(),
                    room_id.as_str()
                );
            }
            MatchOutcome::Waiting => {
                tracing::info!("Client '{}' is waiting for a peer", client_id.as_str());
            }
            MatchOutcome::Ignored => {
                tracing::debug!(
                    "Ignoring find-peer from '{}' (already paired or unknown)",
                    client_id.as_str()
                );
            }
        }

        outcome
    }

    /// 特定のクライアントに通知を送信
    pub async fn notify(
        &self,
        target: &ClientId,
        message: &str,
    ) -> Result<(), MessagePushError> {
        self.message_pusher.push_to(target, message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{ClientIdFactory, Matchboard, MockMessagePusher},
        infrastructure::repository::InMemoryMatchboardRepository,
    };
    use musubi_shared::time::FixedClock;
    use tokio::sync::Mutex;

    fn create_test_usecase() -> (FindPeerUseCase, Arc<InMemoryMatchboardRepository>) {
        let matchboard = Arc::new(Mutex::new(Matchboard::new()));
        let repository = Arc::new(InMemoryMatchboardRepository::new(matchboard));
        let usecase = FindPeerUseCase::new(
            repository.clone(),
            Arc::new(MockMessagePusher::new()),
            Arc::new(FixedClock::new(1000)),
        );
        (usecase, repository)
    }

    async fn register(repository: &InMemoryMatchboardRepository) -> ClientId {
        let id = ClientIdFactory::generate();
        repository.register(id.clone(), Timestamp::new(0)).await;
        id
    }

    #[tokio::test]
    async fn test_unmatched_search_leaves_the_client_waiting() {
        // テスト項目: マッチング不成立時に探索者が待機列に追加される
        // given (前提条件):
        let (usecase, repository) = create_test_usecase();
        let id = register(&repository).await;

        // when (操作):
        let outcome = usecase
            .execute(id.clone(), Interests::default(), ChatMode::Text)
            .await;

        // then (期待する結果):
        assert_eq!(outcome, MatchOutcome::Waiting);
        let board = repository.snapshot().await;
        assert_eq!(board.waiting_count(), 1);
        assert_eq!(board.waiting_entries()[0].client_id, id);
        assert_eq!(board.waiting_entries()[0].enqueued_at.value(), 1000);
    }

    #[tokio::test]
    async fn test_matching_search_creates_a_session_for_both() {
        // テスト項目: マッチング成立時に両者のセッションが作成される
        // given (前提条件): 待機中のクライアント
        let (usecase, repository) = create_test_usecase();
        let alice = register(&repository).await;
        let bob = register(&repository).await;
        usecase
            .execute(alice.clone(), Interests::default(), ChatMode::Text)
            .await;

        // when (操作):
        let outcome = usecase
            .execute(bob.clone(), Interests::default(), ChatMode::Text)
            .await;

        // then (期待する結果):
        match outcome {
            MatchOutcome::Paired { peer_id, .. } => assert_eq!(peer_id, alice),
            other => panic!("expected Paired, got {other:?}"),
        }
        let board = repository.snapshot().await;
        assert_eq!(board.waiting_count(), 0);
        assert_eq!(board.session_count(), 1);
        assert_eq!(board.peer_of(&alice), Some(bob));
    }

    #[tokio::test]
    async fn test_search_while_paired_is_ignored() {
        // テスト項目: セッション中のクライアントからの探索要求は無視される
        // given (前提条件): ペアリング済みの2クライアント
        let (usecase, repository) = create_test_usecase();
        let alice = register(&repository).await;
        let bob = register(&repository).await;
        usecase
            .execute(alice.clone(), Interests::default(), ChatMode::Text)
            .await;
        usecase
            .execute(bob.clone(), Interests::default(), ChatMode::Text)
            .await;

        // when (操作):
        let outcome = usecase
            .execute(alice, Interests::default(), ChatMode::Text)
            .await;

        // then (期待する結果):
        assert_eq!(outcome, MatchOutcome::Ignored);
        assert_eq!(repository.snapshot().await.session_count(), 1);
    }
}
