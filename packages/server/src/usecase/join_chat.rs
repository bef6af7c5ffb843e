//! UseCase: 参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinChatUseCase::execute() メソッド
//! - 入室アナウンスの追記と、新しいセッションのカーソル位置
//!
//! ### なぜこのテストが必要か
//! - 参加者が過去の履歴や自分自身の入室アナウンスを再送されないことを保証
//! - 入室アナウンスと同時に他のクライアントが追記しても、その発言を取りこぼさないことを保証

use std::sync::Arc;

use irori_shared::protocol::joined_announcement;

use crate::domain::{DisplayName, LogEntry, MessageLog, Session};

/// 参加のユースケース
pub struct JoinChatUseCase {
    message_log: Arc<dyn MessageLog>,
}

impl JoinChatUseCase {
    pub fn new(message_log: Arc<dyn MessageLog>) -> Self {
        Self { message_log }
    }

    /// Announce the new participant and open its session.
    ///
    /// The cursor starts right after the join announcement, so the joiner sees
    /// neither earlier history nor its own join line, but does see anything
    /// appended after it.
    pub async fn execute(&self, name: DisplayName) -> Session {
        let index = self
            .message_log
            .append(LogEntry::from_server(joined_announcement(name.as_str())))
            .await;
        Session::new(name, index + 1)
    }
}
