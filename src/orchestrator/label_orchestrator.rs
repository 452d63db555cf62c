//! 标签编排门面 - 编排层
//!
//! 对外暴露三种处理模式（验证 / 翻译 / 详细翻译）、批量与多国家扇出，
//! 以及健康状态的聚合读取。所有远程能力通过注入的接口获得，
//! 后端实现由配置选择。

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::clients::{
    create_processing_client, CircuitState, ProcessingClient, RagHttpClient, ValidationClient,
};
use crate::config::Config;
use crate::error::{LabelError, Result};
use crate::models::{ImageFile, OcrResult, PipelineResult, StructureResult, ValidationResult};
use crate::orchestrator::{batch_processor, fanout_processor, BatchItemOutcome, FanoutOutcome};
use crate::services::{AuditRecorder, FileAuditRecorder};
use crate::workflow::label_flow::wrap_remote;
use crate::workflow::LabelFlow;

/// 聚合健康状态
#[derive(Debug, Serialize)]
pub struct ServiceStatus {
    pub service: &'static str,
    pub food_label_api_healthy: bool,
    pub circuit_breaker_state: String,
    pub status: &'static str,
}

/// 标签编排器
pub struct LabelOrchestrator {
    processing: Arc<dyn ProcessingClient>,
    audit: Arc<dyn AuditRecorder>,
    flow: LabelFlow,
    default_country: String,
    max_concurrent: usize,
}

impl LabelOrchestrator {
    /// 用注入的能力接口创建编排器（测试中注入模拟实现）
    pub fn new(
        processing: Arc<dyn ProcessingClient>,
        validation: Arc<dyn ValidationClient>,
        audit: Arc<dyn AuditRecorder>,
        config: &Config,
    ) -> Self {
        let flow = LabelFlow::new(processing.clone(), validation, audit.clone());
        Self {
            processing,
            audit,
            flow,
            default_country: config.default_country.clone(),
            max_concurrent: config.max_concurrent_requests,
        }
    }

    /// 按配置构建生产环境编排器（HTTP 客户端 + 文件审计）
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let processing = create_processing_client(config)?;
        let validation: Arc<dyn ValidationClient> = Arc::new(RagHttpClient::new(config)?);
        let audit: Arc<dyn AuditRecorder> =
            Arc::new(FileAuditRecorder::new(config.audit_log_file.clone()));
        Ok(Self::new(processing, validation, audit, config))
    }

    fn country_or_default<'a>(&'a self, country: Option<&'a str>) -> &'a str {
        country.unwrap_or(&self.default_country)
    }

    /// 规制验证：完整流水线 + RAG 验证，写一条审计记录
    pub async fn validate(
        &self,
        username: &str,
        image: ImageFile,
        country: Option<&str>,
    ) -> Result<ValidationResult> {
        let country = self.country_or_default(country);
        self.flow.run_validate(username, image, country).await
    }

    /// 翻译：完整流水线，返回渲染后的 HTML
    pub async fn translate(
        &self,
        username: &str,
        image: ImageFile,
        country: Option<&str>,
    ) -> Result<String> {
        let country = self.country_or_default(country);
        self.flow.run_translate(username, image, country).await
    }

    /// 详细翻译：完整流水线，返回各阶段耗时 + 结构化字段 + HTML
    pub async fn translate_detailed(
        &self,
        username: &str,
        image: ImageFile,
        country: Option<&str>,
    ) -> Result<PipelineResult> {
        let country = self.country_or_default(country);
        self.flow
            .run_translate_detailed(username, image, country)
            .await
    }

    /// 批量翻译（上限 20 个文件），结果顺序与输入一致
    pub async fn translate_batch(
        &self,
        username: &str,
        images: Vec<ImageFile>,
        country: Option<&str>,
    ) -> Result<Vec<BatchItemOutcome>> {
        let country = self.country_or_default(country);
        batch_processor::run(
            self.processing.clone(),
            self.audit.clone(),
            username,
            images,
            country,
            self.max_concurrent,
        )
        .await
    }

    /// 多国家翻译扇出（上限 10 个国家）
    pub async fn translate_multi_country(
        &self,
        username: &str,
        image: ImageFile,
        countries: &[String],
    ) -> Result<FanoutOutcome> {
        fanout_processor::run(
            self.processing.clone(),
            username,
            image,
            countries,
            self.max_concurrent,
        )
        .await
    }

    /// 仅 OCR（不写审计记录）
    pub async fn extract_text_only(&self, image: &ImageFile) -> Result<OcrResult> {
        if !image.is_supported_image() {
            return Err(LabelError::invalid_input(format!(
                "不支持的图片格式: {}",
                image.file_name
            )));
        }
        info!("📄 提取文本: {}", image.file_name);
        self.processing
            .extract_text(image)
            .await
            .map_err(|e| wrap_remote("ocr", e))
    }

    /// 仅结构化（不写审计记录）
    pub async fn structure_only(
        &self,
        texts: &[String],
        language: &str,
    ) -> Result<StructureResult> {
        if texts.is_empty() {
            return Err(LabelError::invalid_input("文本列表为空"));
        }
        info!("📑 结构化 {} 段文本, 语言: {}", texts.len(), language);
        self.processing
            .structure_data(texts, language)
            .await
            .map_err(|e| wrap_remote("structure", e))
    }

    /// 聚合健康状态
    ///
    /// 可达性探测与熔断器状态是两个彼此独立的只读操作，
    /// 本方法不会触发熔断器的任何状态迁移。
    pub async fn health_status(&self) -> ServiceStatus {
        let healthy = self.processing.is_reachable().await;
        let state = self.processing.circuit_state();
        ServiceStatus {
            service: "label-api",
            food_label_api_healthy: healthy,
            circuit_breaker_state: state.to_string(),
            status: "ok",
        }
    }

    /// 当前熔断器状态（纯读取）
    pub fn circuit_breaker_state(&self) -> CircuitState {
        self.processing.circuit_state()
    }
}
