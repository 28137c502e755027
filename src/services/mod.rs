//! 服务模块

pub mod chat;
pub mod context;

pub use chat::{ChatService, create_chat_service};
pub use context::{DISCLAIMER, age_on, render_instruction, to_generation_history};
