//! 仓储层
//!
//! 在文档存储客户端之上提供画像和对话历史的类型化访问。
//! 画像存于 `users/{user_id}`，历史存于 `chats/{user_id}` 的 `history` 数组字段。

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::profile::UserProfile;
use crate::models::turn::{ChatRole, ConversationTurn};
use crate::storage::firestore::{FirestoreClient, encode_value, timestamp_value};

/// 画像仓储 trait
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// 根据用户 ID 获取画像，不存在时返回 None
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>>;

    /// 创建或合并画像（仅覆盖提供的字段）
    async fn upsert(&self, user_id: &str, profile: &UserProfile) -> Result<()>;
}

/// 历史仓储 trait
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// 加载用户的全部历史轮次，按存储顺序返回
    async fn load(&self, user_id: &str) -> Result<Vec<ConversationTurn>>;

    /// 以单次追加写入多条轮次，不覆盖既有内容
    async fn append(&self, user_id: &str, turns: &[ConversationTurn]) -> Result<()>;
}

/// 基于文档存储的画像仓储实现
#[derive(Clone)]
pub struct FirestoreProfileRepository {
    client: Arc<FirestoreClient>,
    collection: String,
}

impl FirestoreProfileRepository {
    /// 创建新的仓储实例
    pub fn new(client: Arc<FirestoreClient>, collection: &str) -> Self {
        Self {
            client,
            collection: collection.to_string(),
        }
    }
}

#[async_trait]
impl ProfileRepository for FirestoreProfileRepository {
    async fn get(&self, user_id: &str) -> Result<Option<UserProfile>> {
        debug!("Loading profile for user: {}", user_id);

        let Some(fields) = self.client.get_document(&self.collection, user_id).await? else {
            return Ok(None);
        };

        let profile: UserProfile = serde_json::from_value(fields)?;
        Ok(Some(profile))
    }

    async fn upsert(&self, user_id: &str, profile: &UserProfile) -> Result<()> {
        debug!("Upserting profile for user: {}", user_id);

        let value = serde_json::to_value(profile)?;
        let fields = value
            .as_object()
            .cloned()
            .ok_or_else(|| AppError::Serialization("画像必须序列化为对象".to_string()))?;

        self.client
            .merge_document(&self.collection, user_id, &fields)
            .await
    }
}

/// 基于文档存储的历史仓储实现
#[derive(Clone)]
pub struct FirestoreHistoryRepository {
    client: Arc<FirestoreClient>,
    collection: String,
}

impl FirestoreHistoryRepository {
    /// 创建新的仓储实例
    pub fn new(client: Arc<FirestoreClient>, collection: &str) -> Self {
        Self {
            client,
            collection: collection.to_string(),
        }
    }
}

/// 历史数组的字段名
const HISTORY_FIELD: &str = "history";

/// 将轮次编码为类型标签值（时间戳使用 timestampValue）
fn encode_turn(turn: &ConversationTurn) -> Value {
    let mut fields = Map::new();
    fields.insert(
        "role".to_string(),
        encode_value(&Value::String(turn.role.as_storage_str().to_string())),
    );
    fields.insert(
        "message".to_string(),
        encode_value(&Value::String(turn.message.clone())),
    );
    fields.insert(
        "timestamp".to_string(),
        timestamp_value(&turn.timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)),
    );
    serde_json::json!({ "mapValue": { "fields": Value::Object(fields) } })
}

/// 从解码后的 JSON 记录还原轮次
///
/// 缺少角色或消息的记录被跳过（返回 None）；旧客户端写入的记录
/// 可能缺少时间戳，此时以 Unix 纪元占位。
fn decode_turn(record: &Value) -> Option<ConversationTurn> {
    let role = record
        .get("role")
        .and_then(Value::as_str)
        .and_then(ChatRole::from_storage_str)?;
    let message = record.get("message").and_then(Value::as_str)?;
    let timestamp = record
        .get("timestamp")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

    Some(ConversationTurn::new(role, message, timestamp))
}

#[async_trait]
impl HistoryRepository for FirestoreHistoryRepository {
    async fn load(&self, user_id: &str) -> Result<Vec<ConversationTurn>> {
        debug!("Loading chat history for user: {}", user_id);

        let Some(fields) = self.client.get_document(&self.collection, user_id).await? else {
            return Ok(Vec::new());
        };

        let turns = fields
            .get(HISTORY_FIELD)
            .and_then(Value::as_array)
            .map(|records| records.iter().filter_map(decode_turn).collect())
            .unwrap_or_default();

        Ok(turns)
    }

    async fn append(&self, user_id: &str, turns: &[ConversationTurn]) -> Result<()> {
        debug!(
            "Appending {} turn(s) to history for user: {}",
            turns.len(),
            user_id
        );

        let values: Vec<Value> = turns.iter().map(encode_turn).collect();
        self.client
            .append_array(&self.collection, user_id, HISTORY_FIELD, values)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_turn_maps_roles() {
        let record = json!({
            "role": "assistant",
            "message": "m",
            "timestamp": "2024-06-15T10:00:00Z",
        });
        let turn = decode_turn(&record).unwrap();
        assert_eq!(turn.role, ChatRole::Assistant);
        assert_eq!(turn.message, "m");
    }

    #[test]
    fn test_decode_turn_skips_missing_message() {
        let record = json!({ "role": "assistant", "timestamp": "2024-06-15T10:00:00Z" });
        assert!(decode_turn(&record).is_none());
    }

    #[test]
    fn test_decode_turn_skips_missing_role() {
        let record = json!({ "message": "m" });
        assert!(decode_turn(&record).is_none());
    }

    #[test]
    fn test_decode_turn_skips_unknown_role() {
        let record = json!({ "role": "system", "message": "m" });
        assert!(decode_turn(&record).is_none());
    }

    #[test]
    fn test_decode_turn_tolerates_missing_timestamp() {
        let record = json!({ "role": "user", "message": "hi" });
        let turn = decode_turn(&record).unwrap();
        assert_eq!(turn.timestamp, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_encode_turn_uses_typed_values() {
        let timestamp = "2024-06-15T10:00:00Z".parse::<DateTime<Utc>>().unwrap();
        let turn = ConversationTurn::new(ChatRole::User, "hi", timestamp);
        let encoded = encode_turn(&turn);
        let fields = &encoded["mapValue"]["fields"];
        assert_eq!(fields["role"]["stringValue"], "user");
        assert_eq!(fields["message"]["stringValue"], "hi");
        assert!(fields["timestamp"]["timestampValue"].is_string());
    }
}
