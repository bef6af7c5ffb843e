//! MessageLog trait 定義
//!
//! 全セッションが共有する追記専用のチャットログへのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::LogEntry;

/// Append-only, process-wide sequence of chat events.
///
/// Implementations must make `append` atomic with respect to every other
/// `append`, `length` and `slice` call. An entry at index *i* never changes
/// and is never removed.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageLog: Send + Sync {
    /// Append an entry and return its zero-based index.
    async fn append(&self, entry: LogEntry) -> usize;

    /// Number of entries appended so far.
    async fn length(&self) -> usize;

    /// Entries in `[from, to)`, clamped to the current length.
    async fn slice(&self, from: usize, to: usize) -> Vec<LogEntry>;
}
