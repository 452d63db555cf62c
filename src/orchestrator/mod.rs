//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是标签处理核心的对外入口，负责三种处理模式的调度与聚合。
//!
//! ## 模块划分
//!
//! ### `label_orchestrator` - 对外门面
//! - 单图验证 / 翻译 / 详细翻译（委托流程层）
//! - 单阶段调用（仅 OCR / 仅结构化）
//! - 健康状态与熔断器状态（纯读取，不触发熔断器）
//!
//! ### `batch_processor` - 批量翻译
//! - 上限 20 个文件，超限在任何远程调用之前拒绝
//! - Semaphore 控制并发，单个文件失败不影响其他文件
//! - 结果顺序与输入顺序一致，每个文件按真实结果写一条审计记录
//!
//! ### `fanout_processor` - 多国家扇出
//! - 上限 10 个国家，超限快速拒绝
//! - OCR + 结构化只执行一次，各国家独立翻译 + 渲染
//! - 单个国家失败只从结果中剔除；共享阶段失败才使整个调用失败
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator (批量 / 扇出 / 门面)
//!     ↓
//! workflow::LabelFlow (单张图片的完整流程)
//!     ↓
//! services (能力层：审计记录)
//!     ↓
//! clients (远程网关：处理引擎 / 验证引擎)
//! ```

pub mod batch_processor;
pub mod fanout_processor;
pub mod label_orchestrator;

pub use batch_processor::{BatchItemOutcome, MAX_BATCH_SIZE};
pub use fanout_processor::{FanoutOutcome, MAX_FANOUT_COUNTRIES};
pub use label_orchestrator::{LabelOrchestrator, ServiceStatus};
