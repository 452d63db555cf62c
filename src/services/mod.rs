//! 业务能力层
//!
//! 描述"我能做什么"，不关心流程顺序：
//! - `AuditRecorder` —— 记录一次处理尝试的审计能力

pub mod audit;

pub use audit::{AuditRecorder, FileAuditRecorder};
