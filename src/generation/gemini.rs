//! Gemini 文本生成客户端

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::config::config::GenerationConfig;
use crate::error::{AppError, Result};

/// 生成 API 的消息单元（role + parts）
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Content {
    /// 角色（"user" 或 "model"）
    pub role: String,
    /// 文本片段
    pub parts: Vec<Part>,
}

/// 文本片段
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Part {
    pub text: String,
}

impl Content {
    /// 构造单片段消息
    pub fn text(role: &str, text: &str) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part {
                text: text.to_string(),
            }],
        }
    }
}

/// 文本生成客户端 trait
///
/// 对应托管生成服务的同步契约：系统指令 + 历史 + 新消息 → 回复文本。
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[Content],
        message: &str,
    ) -> Result<String>;
}

/// Gemini REST 客户端
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    /// 创建新的客户端
    pub fn new(config: &GenerationConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        system_instruction: &str,
        history: &[Content],
        message: &str,
    ) -> Result<String> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url, self.model
        );

        let mut contents: Vec<Content> = history.to_vec();
        contents.push(Content::text("user", message));

        let payload = json!({
            "systemInstruction": { "parts": [{ "text": system_instruction }] },
            "contents": contents,
        });

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!(
                "生成请求失败: {}",
                error_text
            )));
        }

        let body: GenerateContentResponse = response.json().await?;
        let reply = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().next())
            .and_then(|p| p.text)
            .ok_or_else(|| AppError::Upstream("生成响应不含候选文本".to_string()))?;

        Ok(reply)
    }
}
