//! 文本生成模块
//!
//! 对接托管的大语言模型生成服务（Gemini 兼容 REST 接口）。

pub mod gemini;

pub use gemini::{Content, GeminiClient, GenerationClient, Part};
