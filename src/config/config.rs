use serde::{Deserialize, Serialize};

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

/// 文档存储配置（Firestore 兼容 REST 接口）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StoreConfig {
    /// REST 基础地址（生产环境或本地模拟器）
    pub base_url: String,
    /// 项目 ID
    pub project_id: String,
    /// 数据库 ID
    pub database_id: String,
    /// 用户画像集合
    pub users_collection: String,
    /// 对话历史集合
    pub chats_collection: String,
    /// 静态 Bearer Token（模拟器或代理场景下可为空）
    pub auth_token: Option<String>,
    /// 请求超时（秒）
    pub timeout: u64,
}

/// 文本生成服务配置（Gemini 兼容 REST 接口）
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GenerationConfig {
    /// REST 基础地址
    pub base_url: String,
    /// API 密钥
    pub api_key: String,
    /// 模型名称
    pub model: String,
    /// 请求超时（秒）
    pub timeout: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
    /// 结构化日志格式
    pub structured: bool,
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 服务器配置
    pub server: ServerConfig,
    /// 文档存储配置
    pub store: StoreConfig,
    /// 文本生成服务配置
    pub generation: GenerationConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".into(),
                port: 8080,
                request_timeout: 60,
            },
            store: StoreConfig {
                base_url: "http://localhost:8087/v1".into(),
                project_id: "asklepios-dev".into(),
                database_id: "(default)".into(),
                users_collection: "users".into(),
                chats_collection: "chats".into(),
                auth_token: None,
                timeout: 10,
            },
            generation: GenerationConfig {
                base_url: "https://generativelanguage.googleapis.com/v1beta".into(),
                api_key: String::new(),
                model: "gemini-1.5-flash".into(),
                timeout: 60,
            },
            logging: LoggingConfig {
                level: "debug".into(),
                structured: false,
            },
            app_name: "asklepios".into(),
            environment: "development".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_development_defaults() {
        let config = AppConfig::development();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.store.users_collection, "users");
        assert_eq!(config.store.chats_collection, "chats");
        assert_eq!(config.generation.model, "gemini-1.5-flash");
    }
}
