//! UseCase: サービス統計の取得
//!
//! HTTP API（`/api/stats`, `/debug/matchboard`）向けに Matchboard の
//! 一貫したスナップショットから統計情報を構築します。

use std::sync::Arc;

use crate::domain::{Matchboard, MatchboardRepository};

/// サービス統計
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// 接続中のクライアント数
    pub online: usize,
    /// マッチング待機中のクライアント数
    pub waiting: usize,
    /// アクティブなセッション数
    pub sessions: usize,
}

/// サービス統計取得のユースケース
pub struct GetStatsUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn MatchboardRepository>,
}

impl GetStatsUseCase {
    /// 新しい GetStatsUseCase を作成
    pub fn new(repository: Arc<dyn MatchboardRepository>) -> Self {
        Self { repository }
    }

    /// 統計情報を取得
    ///
    /// 3つのカウンタは同一スナップショットから読むため、互いに矛盾しない。
    pub async fn execute(&self) -> ServiceStats {
        let board = self.repository.snapshot().await;
        ServiceStats {
            online: board.online_count(),
            waiting: board.waiting_count(),
            sessions: board.session_count(),
        }
    }

    /// Matchboard 全体のスナップショットを取得（デバッグ用途）
    pub async fn snapshot(&self) -> Matchboard {
        self.repository.snapshot().await
    }
}
