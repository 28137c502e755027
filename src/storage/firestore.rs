//! Firestore 兼容文档存储客户端
//!
//! 通过 REST 接口访问外部文档存储，覆盖本服务需要的最小契约：
//! 读取文档、按字段合并写入、数组追加（array union）。
//! Firestore 的字段值采用类型标签编码（stringValue / integerValue / ...），
//! 本模块同时提供该编码与普通 JSON 之间的转换。

use reqwest::StatusCode;
use serde_json::{Map, Value, json};

use crate::config::config::StoreConfig;
use crate::error::{AppError, Result};

/// 将普通 JSON 值编码为 Firestore 类型标签值
///
/// 字符串一律编码为 stringValue；时间戳字段由调用方显式使用
/// [`timestamp_value`] 编码，避免对消息文本做启发式识别。
pub fn encode_value(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode_value).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

/// 将 JSON 对象编码为 Firestore fields 映射
pub fn encode_fields(map: &Map<String, Value>) -> Value {
    let mut fields = Map::new();
    for (key, value) in map {
        fields.insert(key.clone(), encode_value(value));
    }
    Value::Object(fields)
}

/// RFC3339 时间戳的类型标签编码
pub fn timestamp_value(rfc3339: &str) -> Value {
    json!({ "timestampValue": rfc3339 })
}

/// 将 Firestore 类型标签值解码为普通 JSON 值
///
/// timestampValue 解码为 RFC3339 字符串，由上层按需解析。
/// 未知标签解码为 null，而不是报错。
pub fn decode_value(value: &Value) -> Value {
    let Some(obj) = value.as_object() else {
        return Value::Null;
    };

    if let Some(s) = obj.get("stringValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(s) = obj.get("timestampValue").and_then(Value::as_str) {
        return Value::String(s.to_string());
    }
    if let Some(b) = obj.get("booleanValue").and_then(Value::as_bool) {
        return Value::Bool(b);
    }
    if let Some(i) = obj.get("integerValue") {
        // integerValue 以字符串承载 64 位整数
        let parsed = match i {
            Value::String(s) => s.parse::<i64>().ok(),
            Value::Number(n) => n.as_i64(),
            _ => None,
        };
        if let Some(n) = parsed {
            return json!(n);
        }
        return Value::Null;
    }
    if let Some(f) = obj.get("doubleValue").and_then(Value::as_f64) {
        return json!(f);
    }
    if let Some(array) = obj.get("arrayValue") {
        let items: Vec<Value> = array
            .get("values")
            .and_then(Value::as_array)
            .map(|values| values.iter().map(decode_value).collect())
            .unwrap_or_default();
        return Value::Array(items);
    }
    if let Some(map) = obj.get("mapValue") {
        return decode_fields(map.get("fields").unwrap_or(&Value::Null));
    }

    Value::Null
}

/// 将 Firestore fields 映射解码为 JSON 对象
pub fn decode_fields(fields: &Value) -> Value {
    let mut map = Map::new();
    if let Some(obj) = fields.as_object() {
        for (key, value) in obj {
            map.insert(key.clone(), decode_value(value));
        }
    }
    Value::Object(map)
}

/// 文档存储客户端
#[derive(Clone)]
pub struct FirestoreClient {
    /// 配置
    config: StoreConfig,
    /// HTTP 客户端
    http_client: reqwest::Client,
}

impl FirestoreClient {
    /// 创建新的存储客户端
    pub fn new(config: StoreConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// 文档资源名称（不含基础 URL）
    fn document_name(&self, collection: &str, doc_id: &str) -> String {
        format!(
            "projects/{}/databases/{}/documents/{}/{}",
            self.config.project_id,
            self.config.database_id,
            collection,
            urlencoding::encode(doc_id),
        )
    }

    /// 文档完整 URL
    fn document_url(&self, collection: &str, doc_id: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url,
            self.document_name(collection, doc_id)
        )
    }

    /// 附加认证头
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.auth_token {
            Some(token) if !token.is_empty() => request.bearer_auth(token),
            _ => request,
        }
    }

    /// 读取文档，返回解码后的字段对象；文档不存在时返回 None
    pub async fn get_document(&self, collection: &str, doc_id: &str) -> Result<Option<Value>> {
        let url = self.document_url(collection, doc_id);

        let response = self.authorize(self.http_client.get(&url)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("读取文档失败: {}", error_text)));
        }

        let document: Value = response.json().await?;
        let fields = decode_fields(document.get("fields").unwrap_or(&Value::Null));
        Ok(Some(fields))
    }

    /// 按字段合并写入文档（create-or-merge）
    ///
    /// updateMask 仅覆盖传入的顶层字段，未提及的既有字段保持不变。
    pub async fn merge_document(
        &self,
        collection: &str,
        doc_id: &str,
        fields: &Map<String, Value>,
    ) -> Result<()> {
        let url = self.document_url(collection, doc_id);
        let mask: Vec<(&str, &str)> = fields
            .keys()
            .map(|key| ("updateMask.fieldPaths", key.as_str()))
            .collect();
        let body = json!({ "fields": encode_fields(fields) });

        let response = self
            .authorize(self.http_client.patch(&url).query(&mask).json(&body))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("合并文档失败: {}", error_text)));
        }

        Ok(())
    }

    /// 向文档的数组字段追加元素（array union）
    ///
    /// 通过单次 commit 提交全部元素：要么全部写入、要么全部失败，
    /// 且不会覆盖文档中其他字段。文档不存在时会被创建。
    /// `values` 为已编码的类型标签值。
    pub async fn append_array(
        &self,
        collection: &str,
        doc_id: &str,
        field: &str,
        values: Vec<Value>,
    ) -> Result<()> {
        let url = format!(
            "{}/projects/{}/databases/{}/documents:commit",
            self.config.base_url, self.config.project_id, self.config.database_id,
        );
        let body = json!({
            "writes": [{
                "update": {
                    "name": self.document_name(collection, doc_id),
                },
                "updateMask": { "fieldPaths": [] },
                "updateTransforms": [{
                    "fieldPath": field,
                    "appendMissingElements": { "values": values },
                }],
            }]
        });

        let response = self
            .authorize(self.http_client.post(&url).json(&body))
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("追加数组失败: {}", error_text)));
        }

        Ok(())
    }
}
