//! 聊天 DTO
//!
//! 定义聊天相关的请求和响应数据结构。

use serde::{Deserialize, Serialize};

/// 聊天请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct ChatRequest {
    /// 用户 ID
    pub user_id: String,
    /// 用户消息
    pub message: String,
}

/// 聊天响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// 生成的回复文本
    pub reply: String,
}
