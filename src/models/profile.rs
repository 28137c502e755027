use serde::{Deserialize, Serialize};

/// 用户健康画像
///
/// 统一的画像字段全集，所有字段均可缺失。存储在外部文档存储的
/// `users` 集合中，字段名使用 camelCase（与既有文档保持一致）。
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    /// 姓名
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// 出生日期（DD/MM/YYYY 格式字符串）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,

    /// 性别
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,

    /// 血型
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,

    /// 过敏史
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allergies: Option<String>,

    /// 既往病史
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medical_conditions: Option<String>,

    /// 用药情况
    #[serde(skip_serializing_if = "Option::is_none")]
    pub medications: Option<String>,

    /// 是否有跌倒史
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_previous_falls: Option<bool>,

    /// 跌倒描述
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fall_description: Option<String>,

    /// 睡眠时长（小时）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,

    /// 行动能力等级
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobility_level: Option<String>,

    /// 活动量等级
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<String>,

    /// 是否独居
    #[serde(skip_serializing_if = "Option::is_none")]
    pub living_alone: Option<bool>,

    /// 身高（cm）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,

    /// 体重（kg）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// 首选语言
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,

    /// 健康目标（自由文本）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health_goals: Option<String>,
}

impl UserProfile {
    /// 画像是否不含任何字段
    pub fn is_empty(&self) -> bool {
        *self == UserProfile::default()
    }
}
