//! 画像 DTO
//!
//! 定义画像相关的请求和响应数据结构。请求体与存储文档同构
//! （统一的稀疏字段全集），因此直接复用 [`UserProfile`]。

use serde::{Deserialize, Serialize};

use crate::models::profile::UserProfile;

/// 创建或合并画像请求
#[derive(Debug, Deserialize, Default)]
#[serde(transparent)]
pub struct UpsertProfileRequest {
    /// 提供的字段会被合并进既有画像，未提供的字段保持不变
    pub profile: UserProfile,
}

/// 画像写入响应
#[derive(Debug, Serialize, Deserialize)]
pub struct UpsertProfileResponse {
    /// 状态
    pub status: String,
    /// 用户 ID
    pub user_id: String,
}

/// 画像查询响应
#[derive(Debug, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// 用户 ID
    pub user_id: String,
    /// 画像数据
    pub profile: UserProfile,
}
