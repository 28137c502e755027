//! Asklepios - 个性化健康对话服务
//!
//! 将用户消息连同从外部文档存储读取的健康画像一并转发给托管的
//! 大语言模型生成服务，并将对话轮次持久化为只追加的历史记录。

pub mod api;
pub mod config;
pub mod error;
pub mod generation;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
