//! InMemory MessageLog 実装
//!
//! ドメイン層が定義する MessageLog trait の具体的な実装。
//! `Vec<LogEntry>` を単一の読み書きロックで保護します。
//!
//! ロックは 1 回の追記、または 1 回の長さ取得・スライス取得の間だけ保持され、
//! ネットワーク I/O をまたいで保持されることはありません。
//! ログはサーバーの稼働中ずっと伸び続けます（コンパクションなし）。

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{LogEntry, MessageLog};

/// インメモリ MessageLog 実装
#[derive(Debug, Default)]
pub struct InMemoryMessageLog {
    entries: RwLock<Vec<LogEntry>>,
}

impl InMemoryMessageLog {
    /// 空のログを作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageLog for InMemoryMessageLog {
    async fn append(&self, entry: LogEntry) -> usize {
        let mut entries = self.entries.write().await;
        entries.push(entry);
        entries.len() - 1
    }

    async fn length(&self) -> usize {
        self.entries.read().await.len()
    }

    async fn slice(&self, from: usize, to: usize) -> Vec<LogEntry> {
        let entries = self.entries.read().await;
        let to = to.min(entries.len());
        if from >= to {
            return Vec::new();
        }
        entries[from..to].to_vec()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    // ========================================
    // テスト作業記録
    // ========================================
    // 【何をテストするか】
    // - 追記が連番のインデックスを返すこと
    // - スライスが現在の長さに丸められること
    // - 並行追記でエントリが失われず、送信者ごとの順序が保たれること
    // ========================================

    #[tokio::test]
    async fn test_append_returns_sequential_indexes() {
        // テスト項目: 追記ごとに 0 始まりの連番インデックスが返される
        // given (前提条件):
        let log = InMemoryMessageLog::new();

        // when (操作):
        let first = log.append(LogEntry::new("alice", "one")).await;
        let second = log.append(LogEntry::new("bob", "two")).await;

        // then (期待する結果):
        assert_eq!(first, 0);
        assert_eq!(second, 1);
        assert_eq!(log.length().await, 2);
    }

    #[tokio::test]
    async fn test_slice_returns_range_in_append_order() {
        // テスト項目: スライスが追記順で指定範囲を返す
        // given (前提条件):
        let log = InMemoryMessageLog::new();
        for content in ["a", "b", "c", "d"] {
            log.append(LogEntry::new("alice", content)).await;
        }

        // when (操作):
        let slice = log.slice(1, 3).await;

        // then (期待する結果):
        let contents: Vec<&str> = slice.iter().map(|e| e.content()).collect();
        assert_eq!(contents, vec!["b", "c"]);
    }

    #[tokio::test]
    async fn test_slice_is_clamped_to_length() {
        // テスト項目: 範囲外のスライス指定は現在の長さに丸められる
        // given (前提条件):
        let log = InMemoryMessageLog::new();
        log.append(LogEntry::new("alice", "only")).await;

        // when (操作):
        let past_end = log.slice(0, 10).await;
        let empty = log.slice(1, 10).await;
        let inverted = log.slice(1, 0).await;

        // then (期待する結果):
        assert_eq!(past_end.len(), 1);
        assert!(empty.is_empty());
        assert!(inverted.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_appends_lose_nothing() {
        // テスト項目: 並行追記でエントリが失われず、各送信者の順序が保たれる
        // given (前提条件):
        let log = Arc::new(InMemoryMessageLog::new());
        let writers = 8;
        let per_writer = 100;

        // when (操作):
        let handles: Vec<_> = (0..writers)
            .map(|w| {
                let log = log.clone();
                tokio::spawn(async move {
                    for i in 0..per_writer {
                        log.append(LogEntry::new(format!("user{}", w), i.to_string()))
                            .await;
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        // then (期待する結果):
        let total = log.length().await;
        assert_eq!(total, writers * per_writer);

        let entries = log.slice(0, total).await;
        for w in 0..writers {
            let sender = format!("user{}", w);
            let seen: Vec<usize> = entries
                .iter()
                .filter(|e| e.sender() == sender)
                .map(|e| e.content().parse().unwrap())
                .collect();
            assert_eq!(seen, (0..per_writer).collect::<Vec<_>>());
        }
    }
}
