use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 对话角色
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// 用户消息
    User,
    /// 助手消息
    Assistant,
}

impl ChatRole {
    /// 存储层角色名称
    pub fn as_storage_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }

    /// 生成 API 的角色名称
    ///
    /// 存储层使用 "assistant"，而生成 API 端使用 "model"；
    /// "user" 在两侧一致。
    pub fn as_generation_str(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "model",
        }
    }

    /// 从存储层角色名称解析，未知角色返回 None
    pub fn from_storage_str(s: &str) -> Option<Self> {
        match s {
            "user" => Some(ChatRole::User),
            "assistant" => Some(ChatRole::Assistant),
            _ => None,
        }
    }
}

/// 对话轮次实体
///
/// 每个用户持有一个按时间排序、只追加的轮次序列，构成完整的对话审计记录。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConversationTurn {
    /// 消息角色
    pub role: ChatRole,

    /// 消息内容
    pub message: String,

    /// 捕获时间戳（一次交互的两条轮次共享同一时间戳）
    pub timestamp: DateTime<Utc>,
}

impl ConversationTurn {
    /// 创建新轮次
    pub fn new(role: ChatRole, message: &str, timestamp: DateTime<Utc>) -> Self {
        Self {
            role,
            message: message.to_string(),
            timestamp,
        }
    }

    /// 一次完整交互产生的轮次对（用户消息 + 助手回复，时间戳相同）
    pub fn exchange_pair(
        user_message: &str,
        assistant_reply: &str,
        timestamp: DateTime<Utc>,
    ) -> [Self; 2] {
        [
            Self::new(ChatRole::User, user_message, timestamp),
            Self::new(ChatRole::Assistant, assistant_reply, timestamp),
        ]
    }
}
