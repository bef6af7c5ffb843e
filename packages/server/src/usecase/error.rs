//! UseCase 層のエラー型

use thiserror::Error;

/// メッセージ投稿のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PostMessageError {
    /// 改行を除いた結果が空のメッセージ
    #[error("message is empty")]
    EmptyContent,
}
