//! 审计记录模型
//!
//! 每次流水线调用写入恰好一条记录（成功或失败），写入后不再修改。

use serde::{Deserialize, Serialize};

/// 处理类型
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingType {
    Validate,
    Translate,
    TranslateBatch,
}

/// 处理结果状态
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Completed,
    Failed,
}

/// 审计记录
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AuditRecord {
    #[serde(rename = "type")]
    pub processing_type: ProcessingType,
    pub file_name: String,
    pub date: String,
    pub time: String,
    pub status: AuditStatus,
    pub error_count: u32,
    pub warning_count: u32,
    pub country: String,
}

impl AuditRecord {
    /// 以当前时间构造一条记录
    ///
    /// 日期 / 时间格式与历史存储约定一致（`2025.08.29` / `14:05`）。
    pub fn now(
        processing_type: ProcessingType,
        file_name: impl Into<String>,
        status: AuditStatus,
        error_count: u32,
        warning_count: u32,
        country: impl Into<String>,
    ) -> Self {
        let now = chrono::Local::now();
        Self {
            processing_type,
            file_name: file_name.into(),
            date: now.format("%Y.%m.%d").to_string(),
            time: now.format("%H:%M").to_string(),
            status,
            error_count,
            warning_count,
            country: country.into(),
        }
    }
}
