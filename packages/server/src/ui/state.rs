//! Shared server context handed to every connection.

use std::sync::Arc;

use crate::{
    config::ServerConfig,
    domain::MessageLog,
    lifecycle::ShutdownCoordinator,
    usecase::{JoinChatUseCase, LeaveChatUseCase, PostMessageUseCase},
};

/// Shared application state
///
/// Built once at startup; connections only ever see it through an `Arc`.
pub struct AppState {
    /// Tunables
    pub config: ServerConfig,
    /// MessageLog（全セッション共有のチャットログ）
    pub message_log: Arc<dyn MessageLog>,
    /// JoinChatUseCase（参加のユースケース）
    pub join_chat_usecase: Arc<JoinChatUseCase>,
    /// PostMessageUseCase（メッセージ投稿のユースケース）
    pub post_message_usecase: Arc<PostMessageUseCase>,
    /// LeaveChatUseCase（退室のユースケース）
    pub leave_chat_usecase: Arc<LeaveChatUseCase>,
    /// Server-wide shutdown signal and live connection tracking
    pub shutdown: ShutdownCoordinator,
}

impl AppState {
    pub fn new(config: ServerConfig, message_log: Arc<dyn MessageLog>) -> Self {
        Self {
            config,
            join_chat_usecase: Arc::new(JoinChatUseCase::new(message_log.clone())),
            post_message_usecase: Arc::new(PostMessageUseCase::new(message_log.clone())),
            leave_chat_usecase: Arc::new(LeaveChatUseCase::new(message_log.clone())),
            message_log,
            shutdown: ShutdownCoordinator::new(),
        }
    }
}
