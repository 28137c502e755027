//! 核心数据模型模块
//!
//! 定义 Asklepios 的核心数据结构：UserProfile, ConversationTurn 等。

pub mod profile;
pub mod turn;

pub use profile::*;
pub use turn::*;
