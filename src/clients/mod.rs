//! 远程服务客户端层
//!
//! ## 职责
//!
//! 两个远程引擎的类型化网关，对上层只暴露能力接口：
//!
//! - `ProcessingClient` —— OCR → 结构化 → 翻译 → 渲染 流水线引擎
//! - `ValidationClient` —— 规制验证（RAG）引擎
//!
//! 上层通过 `Arc<dyn Trait>` 持有客户端，后端实现由配置选择
//! （见 `create_processing_client`），测试中则注入模拟实现。

pub mod breaker;
pub mod pipeline_client;
pub mod rag_client;

pub use breaker::{CircuitBreaker, CircuitState};
pub use pipeline_client::{create_processing_client, HttpPipelineClient};
pub use rag_client::RagHttpClient;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::{
    ImageFile, OcrResult, PipelineResult, ProcessingRequest, StructureResult, TranslatedData,
    ValidationResult,
};

/// 处理引擎能力接口
///
/// 既可整条流水线一次跑完（单图场景），也可分阶段调用
/// （多国家扇出场景复用一次 OCR + 结构化）。
#[async_trait]
pub trait ProcessingClient: Send + Sync {
    /// 完整流水线：OCR → 结构化 → 翻译 → 渲染
    async fn run_full_pipeline(&self, request: &ProcessingRequest) -> Result<PipelineResult>;

    /// 仅 OCR
    async fn extract_text(&self, image: &ImageFile) -> Result<OcrResult>;

    /// 仅结构化（文本 → JSON）
    async fn structure_data(&self, texts: &[String], language: &str) -> Result<StructureResult>;

    /// 仅翻译（结构化数据 → 目标国家格式）
    async fn translate(
        &self,
        data: &Value,
        language: &str,
        target_country: &str,
    ) -> Result<TranslatedData>;

    /// 仅渲染（翻译数据 → HTML）
    async fn render_html(&self, country: &str, data: &Value) -> Result<String>;

    /// 远程端点是否可达（轻量探测，绕过熔断器）
    async fn is_reachable(&self) -> bool;

    /// 当前熔断器状态（纯读取）
    fn circuit_state(&self) -> CircuitState;
}

/// 验证引擎能力接口
#[async_trait]
pub trait ValidationClient: Send + Sync {
    /// 对渲染后的 HTML 做规制验证
    async fn validate(&self, html: &str) -> Result<ValidationResult>;
}
