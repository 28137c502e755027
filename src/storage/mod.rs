//! 存储层模块
//!
//! 提供数据持久化服务，对接 Firestore 兼容的外部文档存储。

pub mod firestore;
pub mod repository;
