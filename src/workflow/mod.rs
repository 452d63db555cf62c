//! 流程层
//!
//! 定义"一张标签图片"的完整处理流程：
//! 输入检查 → 远程流水线 → （验证模式）规制验证 → 审计记录

pub mod label_ctx;
pub mod label_flow;

pub use label_ctx::LabelCtx;
pub use label_flow::LabelFlow;
