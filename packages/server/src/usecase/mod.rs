//! UseCase layer: what happens to the message log when clients join, talk and leave.

mod error;
mod join_chat;
mod leave_chat;
mod post_message;

pub use error::PostMessageError;
pub use join_chat::JoinChatUseCase;
pub use leave_chat::LeaveChatUseCase;
pub use post_message::PostMessageUseCase;
