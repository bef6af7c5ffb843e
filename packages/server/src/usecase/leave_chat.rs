//! UseCase: 退室処理

use std::sync::Arc;

use irori_shared::protocol::left_announcement;

use crate::domain::{DisplayName, LogEntry, MessageLog};

/// 退室のユースケース
pub struct LeaveChatUseCase {
    message_log: Arc<dyn MessageLog>,
}

impl LeaveChatUseCase {
    pub fn new(message_log: Arc<dyn MessageLog>) -> Self {
        Self { message_log }
    }

    /// Announce that a participant left. Returns the announcement's index.
    pub async fn execute(&self, name: &DisplayName) -> usize {
        self.message_log
            .append(LogEntry::from_server(left_announcement(name.as_str())))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockMessageLog;

    #[tokio::test]
    async fn test_leave_appends_announcement() {
        // テスト項目: 退室時に SERVER 名義の退室アナウンスが追記される
        // given (前提条件):
        let mut log = MockMessageLog::new();
        log.expect_append()
            .withf(|entry| entry.to_string() == "SERVER: alice has left the chat")
            .times(1)
            .returning(|_| 7);
        let usecase = LeaveChatUseCase::new(Arc::new(log));

        // when (操作):
        let index = usecase.execute(&DisplayName::parse("alice").unwrap()).await;

        // then (期待する結果):
        assert_eq!(index, 7);
    }
}
