//! 审计记录服务 - 业务能力层
//!
//! 只负责"追加一条审计记录"能力：
//! - 每次流水线调用尝试写入恰好一条
//! - 只追加，从不查询或删除
//! - 写入失败由流程层吞掉并记日志，不影响调用方看到的处理结果

use async_trait::async_trait;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use tracing::debug;

use crate::error::{LabelError, Result};
use crate::models::AuditRecord;

/// 审计记录能力接口
#[async_trait]
pub trait AuditRecorder: Send + Sync {
    /// 以指定用户身份追加一条记录
    async fn record(&self, username: &str, record: AuditRecord) -> Result<()>;
}

/// 落盘的审计行格式
#[derive(Serialize)]
struct AuditLine<'a> {
    username: &'a str,
    #[serde(flatten)]
    record: &'a AuditRecord,
}

/// 基于 JSONL 文件的审计记录器
///
/// 每条记录一行 JSON，追加写入。
pub struct FileAuditRecorder {
    file_path: String,
}

impl FileAuditRecorder {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }
}

#[async_trait]
impl AuditRecorder for FileAuditRecorder {
    async fn record(&self, username: &str, record: AuditRecord) -> Result<()> {
        debug!(
            "写入审计记录: user={}, type={:?}, status={:?}",
            username, record.processing_type, record.status
        );

        let line = AuditLine {
            username,
            record: &record,
        };
        let json = serde_json::to_string(&line).map_err(|e| LabelError::Audit {
            message: e.to_string(),
        })?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)
            .map_err(|e| LabelError::Audit {
                message: format!("{}: {}", self.file_path, e),
            })?;

        writeln!(file, "{}", json).map_err(|e| LabelError::Audit {
            message: e.to_string(),
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AuditStatus, ProcessingType};

    #[tokio::test]
    async fn test_records_append_as_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");
        let recorder = FileAuditRecorder::new(path.to_string_lossy().to_string());

        let record = AuditRecord::now(
            ProcessingType::Validate,
            "label.png",
            AuditStatus::Completed,
            2,
            1,
            "USA",
        );
        recorder.record("alice", record.clone()).await.unwrap();
        recorder.record("bob", record).await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["username"], "alice");
        assert_eq!(first["type"], "validate");
        assert_eq!(first["status"], "completed");
        assert_eq!(first["error_count"], 2);

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["username"], "bob");
    }

    #[tokio::test]
    async fn test_record_to_bad_path_fails() {
        let recorder = FileAuditRecorder::new("/nonexistent_dir/audit.jsonl");
        let record = AuditRecord::now(
            ProcessingType::Translate,
            "a.png",
            AuditStatus::Failed,
            0,
            0,
            "USA",
        );
        let err = recorder.record("alice", record).await.unwrap_err();
        assert!(matches!(err, LabelError::Audit { .. }));
    }
}
