//! RAG 验证引擎客户端
//!
//! 封装对规制验证引擎的调用：输入渲染后的 HTML，返回结构化的验证结论。

use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::clients::ValidationClient;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::ValidationResult;

/// 基于 HTTP 的验证引擎客户端
pub struct RagHttpClient {
    http: reqwest::Client,
    base_url: String,
}

impl RagHttpClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.rag_api_base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl ValidationClient for RagHttpClient {
    async fn validate(&self, html: &str) -> Result<ValidationResult> {
        const PATH: &str = "/api/validate";
        debug!("提交 HTML 验证，长度 {} 字符", html.len());

        let resp = self
            .http
            .post(format!("{}{}", self.base_url, PATH))
            .json(&json!({ "html": html }))
            .send()
            .await
            .map_err(|source| ApiError::RequestFailed {
                endpoint: PATH.to_string(),
                source,
            })?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.ok().filter(|s| !s.is_empty());
            return Err(ApiError::BadResponse {
                endpoint: PATH.to_string(),
                status: status.as_u16(),
                message,
            }
            .into());
        }

        resp.json::<ValidationResult>().await.map_err(|source| {
            ApiError::JsonParseFailed {
                endpoint: PATH.to_string(),
                source,
            }
            .into()
        })
    }
}
