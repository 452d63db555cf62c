//! # Label Pipeline
//!
//! 食品标签处理编排核心：把一张上传的标签图片变成经过验证 / 翻译的输出。
//!
//! ## 架构设计
//!
//! 本系统采用严格的四层架构：
//!
//! ### ① 客户端层（Clients）
//! - `clients/` - 两个远程引擎的类型化网关
//! - `ProcessingClient` - OCR → 结构化 → 翻译 → 渲染 流水线引擎（含熔断器）
//! - `ValidationClient` - RAG 规制验证引擎
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `AuditRecorder` - 审计记录能力（每次处理尝试恰好一条，只追加）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一张标签图片"的完整处理流程
//! - `LabelCtx` - 上下文封装（用户 + 文件 + 目标国家）
//! - `LabelFlow` - 流程编排（输入检查 → 流水线 → 验证 → 审计）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/label_orchestrator` - 对外门面与健康状态聚合
//! - `orchestrator/batch_processor` - 批量翻译（上限 20，失败隔离，保序）
//! - `orchestrator/fanout_processor` - 多国家扇出（共享 OCR/结构化，上限 10）

pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use clients::{CircuitState, ProcessingClient, ValidationClient};
pub use config::Config;
pub use error::{LabelError, Result};
pub use models::{AuditRecord, ImageFile, PipelineResult, ValidationResult};
pub use orchestrator::{
    BatchItemOutcome, FanoutOutcome, LabelOrchestrator, ServiceStatus, MAX_BATCH_SIZE,
    MAX_FANOUT_COUNTRIES,
};
pub use services::AuditRecorder;
pub use workflow::{LabelCtx, LabelFlow};
