//! UseCase: メッセージ投稿処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - PostMessageUseCase::execute() メソッド
//! - 行末の改行除去と、空メッセージの破棄
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージの追記
//! - エッジケース：改行だけの行（ログには何も追記されない）

use std::sync::Arc;

use crate::domain::{DisplayName, LogEntry, MessageLog};

use super::error::PostMessageError;

/// メッセージ投稿のユースケース
pub struct PostMessageUseCase {
    message_log: Arc<dyn MessageLog>,
}

impl PostMessageUseCase {
    pub fn new(message_log: Arc<dyn MessageLog>) -> Self {
        Self { message_log }
    }

    /// Append one chat line from `sender`.
    ///
    /// Line terminators are trimmed from the end; a line that is empty
    /// afterwards is refused and nothing is appended.
    ///
    /// # Returns
    ///
    /// * `Ok(usize)` - index of the appended entry
    /// * `Err(PostMessageError::EmptyContent)` - nothing to post
    pub async fn execute(
        &self,
        sender: &DisplayName,
        line: &str,
    ) -> Result<usize, PostMessageError> {
        let content = line.trim_end_matches(['\r', '\n']);
        if content.is_empty() {
            return Err(PostMessageError::EmptyContent);
        }

        let index = self
            .message_log
            .append(LogEntry::new(sender.as_str(), content))
            .await;
        Ok(index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{domain::MockMessageLog, infrastructure::InMemoryMessageLog};

    fn alice() -> DisplayName {
        DisplayName::parse("alice").unwrap()
    }

    #[tokio::test]
    async fn test_post_message_appends_trimmed_content() {
        // テスト項目: 行末の改行を除いた内容が送信者名義で追記される
        // given (前提条件):
        let log = Arc::new(InMemoryMessageLog::new());
        let usecase = PostMessageUseCase::new(log.clone());

        // when (操作):
        let result = usecase.execute(&alice(), "hello there\r\n").await;

        // then (期待する結果):
        assert_eq!(result, Ok(0));
        assert_eq!(log.slice(0, 1).await, vec![LogEntry::new("alice", "hello there")]);
    }

    #[tokio::test]
    async fn test_post_message_keeps_inner_whitespace() {
        // テスト項目: 改行以外の空白は内容の一部として保持される
        // given (前提条件):
        let log = Arc::new(InMemoryMessageLog::new());
        let usecase = PostMessageUseCase::new(log.clone());

        // when (操作):
        usecase.execute(&alice(), "  indented\n").await.unwrap();

        // then (期待する結果):
        assert_eq!(log.slice(0, 1).await[0].content(), "  indented");
    }

    #[tokio::test]
    async fn test_post_message_discards_empty_line() {
        // テスト項目: 改行のみの行はログに追記されない
        // given (前提条件):
        let mut log = MockMessageLog::new();
        log.expect_append().never();
        let usecase = PostMessageUseCase::new(Arc::new(log));

        // when (操作):
        let result = usecase.execute(&alice(), "\r\n").await;

        // then (期待する結果):
        assert_eq!(result, Err(PostMessageError::EmptyContent));
    }
}
