//! Food Label 处理引擎客户端
//!
//! 封装所有与处理引擎（OCR / 结构化 / 翻译 / 渲染）相关的调用逻辑。
//! 所有数据调用都经过内部熔断器；健康探测走独立的轻量通道，
//! 不经过熔断器，也不会改变熔断器计数。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::clients::breaker::{CircuitBreaker, CircuitState};
use crate::clients::ProcessingClient;
use crate::config::Config;
use crate::error::{ApiError, Result};
use crate::models::{
    ImageFile, OcrResult, PipelineResult, ProcessingRequest, StructureResult, TranslatedData,
};

/// 基于 HTTP 的处理引擎客户端
pub struct HttpPipelineClient {
    http: reqwest::Client,
    base_url: String,
    health_timeout: Duration,
    breaker: CircuitBreaker,
}

impl HttpPipelineClient {
    /// 根据配置创建客户端
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.pipeline_api_base_url.trim_end_matches('/').to_string(),
            health_timeout: Duration::from_secs(config.health_timeout_secs),
            breaker: CircuitBreaker::new(
                config.breaker_failure_threshold,
                Duration::from_secs(config.breaker_open_secs),
            ),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 熔断器门控：打开状态直接拒绝，不发出请求
    fn check_breaker(&self, path: &str) -> Result<()> {
        if self.breaker.allow_request() {
            Ok(())
        } else {
            Err(ApiError::CircuitOpen {
                endpoint: path.to_string(),
            }
            .into())
        }
    }

    /// 将调用结果计入熔断器
    fn track<T>(&self, result: Result<T>) -> Result<T> {
        match &result {
            Ok(_) => self.breaker.on_success(),
            Err(_) => self.breaker.on_failure(),
        }
        result
    }

    /// 检查响应状态码，非 2xx 转为 BadResponse
    async fn check_status(path: &str, resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let message = resp.text().await.ok().filter(|s| !s.is_empty());
        Err(ApiError::BadResponse {
            endpoint: path.to_string(),
            status: status.as_u16(),
            message,
        }
        .into())
    }

    async fn post_multipart(&self, path: &str, form: Form) -> Result<reqwest::Response> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .multipart(form)
            .send()
            .await
            .map_err(|source| ApiError::RequestFailed {
                endpoint: path.to_string(),
                source,
            })?;
        Self::check_status(path, resp).await
    }

    async fn post_json(&self, path: &str, body: &Value) -> Result<reqwest::Response> {
        let resp = self
            .http
            .post(self.endpoint(path))
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::RequestFailed {
                endpoint: path.to_string(),
                source,
            })?;
        Self::check_status(path, resp).await
    }

    fn image_part(image: &ImageFile) -> Part {
        Part::bytes(image.bytes.clone()).file_name(image.file_name.clone())
    }

    async fn parse_json<T: serde::de::DeserializeOwned>(
        path: &str,
        resp: reqwest::Response,
    ) -> Result<T> {
        resp.json::<T>().await.map_err(|source| {
            ApiError::JsonParseFailed {
                endpoint: path.to_string(),
                source,
            }
            .into()
        })
    }
}

#[async_trait]
impl ProcessingClient for HttpPipelineClient {
    async fn run_full_pipeline(&self, request: &ProcessingRequest) -> Result<PipelineResult> {
        const PATH: &str = "/api/pipeline";
        self.check_breaker(PATH)?;
        debug!(
            "调用完整流水线: file={}, country={}",
            request.image.file_name, request.target_country
        );

        let form = Form::new()
            .part("file", Self::image_part(&request.image))
            .text("target_country", request.target_country.clone())
            .text("generate_html", request.generate_html.to_string());

        let result = async {
            let resp = self.post_multipart(PATH, form).await?;
            Self::parse_json::<PipelineResult>(PATH, resp).await
        }
        .await;
        self.track(result)
    }

    async fn extract_text(&self, image: &ImageFile) -> Result<OcrResult> {
        const PATH: &str = "/api/ocr";
        self.check_breaker(PATH)?;
        debug!("调用 OCR: file={}", image.file_name);

        let form = Form::new().part("file", Self::image_part(image));
        let result = async {
            let resp = self.post_multipart(PATH, form).await?;
            Self::parse_json::<OcrResult>(PATH, resp).await
        }
        .await;
        self.track(result)
    }

    async fn structure_data(&self, texts: &[String], language: &str) -> Result<StructureResult> {
        const PATH: &str = "/api/structure";
        self.check_breaker(PATH)?;
        debug!("调用结构化: language={}, texts={} 段", language, texts.len());

        let body = json!({ "language": language, "texts": texts });
        let result = async {
            let resp = self.post_json(PATH, &body).await?;
            Self::parse_json::<StructureResult>(PATH, resp).await
        }
        .await;
        self.track(result)
    }

    async fn translate(
        &self,
        data: &Value,
        language: &str,
        target_country: &str,
    ) -> Result<TranslatedData> {
        const PATH: &str = "/api/translate";
        self.check_breaker(PATH)?;
        debug!("调用翻译: language={}, country={}", language, target_country);

        let body = json!({
            "language": language,
            "data": data,
            "target_country": target_country,
        });
        let result = async {
            let resp = self.post_json(PATH, &body).await?;
            Self::parse_json::<TranslatedData>(PATH, resp).await
        }
        .await;
        self.track(result)
    }

    async fn render_html(&self, country: &str, data: &Value) -> Result<String> {
        const PATH: &str = "/api/html";
        self.check_breaker(PATH)?;
        debug!("调用 HTML 渲染: country={}", country);

        let body = json!({ "country": country, "data": data });
        let result = async {
            let resp = self.post_json(PATH, &body).await?;
            let html = resp.text().await.map_err(|source| ApiError::JsonParseFailed {
                endpoint: PATH.to_string(),
                source,
            })?;
            if html.is_empty() {
                return Err(ApiError::EmptyResponse {
                    endpoint: PATH.to_string(),
                }
                .into());
            }
            Ok(html)
        }
        .await;
        self.track(result)
    }

    async fn is_reachable(&self) -> bool {
        // 专用轻量探测，绕过熔断器，失败也不计入熔断器
        let result = self
            .http
            .get(self.endpoint("/health"))
            .timeout(self.health_timeout)
            .send()
            .await;

        match result {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                warn!("健康探测失败: {}", e);
                false
            }
        }
    }

    fn circuit_state(&self) -> CircuitState {
        self.breaker.state()
    }
}

/// 按配置选择处理后端
///
/// 目前仅提供多阶段流水线后端；接口留给后续其他实现。
pub fn create_processing_client(config: &Config) -> anyhow::Result<Arc<dyn ProcessingClient>> {
    match config.processing_backend.as_str() {
        "pipeline" => Ok(Arc::new(HttpPipelineClient::new(config)?)),
        other => anyhow::bail!("未知的处理后端: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_config() -> Config {
        Config {
            // 端口 1 未监听，连接立即被拒绝
            pipeline_api_base_url: "http://127.0.0.1:1".to_string(),
            request_timeout_secs: 2,
            health_timeout_secs: 1,
            breaker_failure_threshold: 1,
            breaker_open_secs: 60,
            ..Config::default()
        }
    }

    #[test]
    fn test_factory_rejects_unknown_backend() {
        let config = Config {
            processing_backend: "monolithic".to_string(),
            ..Config::default()
        };
        assert!(create_processing_client(&config).is_err());
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = Config {
            pipeline_api_base_url: "http://localhost:8001/".to_string(),
            ..Config::default()
        };
        let client = HttpPipelineClient::new(&config).unwrap();
        assert_eq!(client.endpoint("/api/ocr"), "http://localhost:8001/api/ocr");
    }

    #[tokio::test]
    async fn test_failure_opens_breaker_and_short_circuits() {
        let client = HttpPipelineClient::new(&unreachable_config()).unwrap();
        assert_eq!(client.circuit_state(), CircuitState::Closed);

        let image = ImageFile::new("a.png", vec![0u8; 16]);
        let err = client.extract_text(&image).await.unwrap_err();
        assert!(err.is_unavailable());
        assert_eq!(client.circuit_state(), CircuitState::Open);

        // 熔断器打开后直接拒绝，不再发出请求
        let err = client.extract_text(&image).await.unwrap_err();
        assert!(matches!(
            err,
            crate::error::LabelError::Api(ApiError::CircuitOpen { .. })
        ));
    }

    #[tokio::test]
    async fn test_health_probe_does_not_touch_breaker() {
        let client = HttpPipelineClient::new(&unreachable_config()).unwrap();
        assert!(!client.is_reachable().await);
        // 探测失败不计入熔断器
        assert_eq!(client.circuit_state(), CircuitState::Closed);
    }
}
