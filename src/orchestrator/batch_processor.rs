//! 批量翻译处理器 - 编排层
//!
//! ## 核心功能
//!
//! 1. **快速拒绝**：超过 20 个文件在任何远程调用之前整体拒绝
//! 2. **并发控制**：使用 Semaphore 限制同时发出的流水线请求数
//! 3. **失败隔离**：单个文件的流水线失败不影响其他文件
//! 4. **顺序保证**：结果顺序与输入顺序一致，与完成顺序无关
//! 5. **审计**：每个输入文件写恰好一条记录，状态取真实结果

use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info};

use crate::clients::ProcessingClient;
use crate::error::{LabelError, Result};
use crate::models::{
    AuditRecord, AuditStatus, ImageFile, PipelineResult, ProcessingRequest, ProcessingType,
};
use crate::services::AuditRecorder;
use crate::workflow::label_flow::{check_input, normalize_country};
use crate::workflow::LabelCtx;

/// 单次批量调用的文件数上限
pub const MAX_BATCH_SIZE: usize = 20;

/// 批量处理中单个文件的结果
#[derive(Debug)]
pub struct BatchItemOutcome {
    /// 原始文件名
    pub source_file: String,
    /// 该文件的流水线结果或错误
    pub outcome: Result<PipelineResult>,
}

/// 批量翻译
///
/// 返回值每个输入文件恰好一项，顺序与输入一致。
pub(crate) async fn run(
    processing: Arc<dyn ProcessingClient>,
    audit: Arc<dyn AuditRecorder>,
    username: &str,
    images: Vec<ImageFile>,
    country: &str,
    max_concurrent: usize,
) -> Result<Vec<BatchItemOutcome>> {
    if images.is_empty() {
        return Err(LabelError::invalid_input("批量请求中没有文件"));
    }
    if images.len() > MAX_BATCH_SIZE {
        return Err(LabelError::invalid_input(format!(
            "最多支持 {} 个文件，收到 {} 个",
            MAX_BATCH_SIZE,
            images.len()
        )));
    }

    // 国家代码整体检查一次：不合法则整批拒绝，不发任何远程请求
    let country = normalize_country(country)?;

    let total = images.len();
    info!(
        "📦 开始批量翻译: {} 个文件 → {} (用户: {}, 并发上限: {})",
        total, country, username, max_concurrent
    );

    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut handles = Vec::with_capacity(total);

    for (idx, image) in images.into_iter().enumerate() {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| LabelError::unavailable("batch", e))?;

        let processing = processing.clone();
        let audit = audit.clone();
        let username = username.to_string();
        let country = country.clone();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let ctx = LabelCtx::new(&username, &image.file_name, &country).with_index(idx + 1);
            let source_file = image.file_name.clone();

            let outcome = match check_input(&image, &country) {
                Ok(_) => {
                    let request = ProcessingRequest::new(image, &country, true);
                    processing.run_full_pipeline(&request).await
                }
                Err(e) => Err(e),
            };

            let status = match &outcome {
                Ok(_) => {
                    info!("✓ {} 翻译完成", ctx);
                    AuditStatus::Completed
                }
                Err(e) => {
                    error!("❌ {} 翻译失败: {}", ctx, e);
                    AuditStatus::Failed
                }
            };

            let record = AuditRecord::now(
                ProcessingType::TranslateBatch,
                &source_file,
                status,
                0,
                0,
                &country,
            );
            if let Err(e) = audit.record(&username, record).await {
                error!("{} 审计记录写入失败（已忽略）: {}", ctx, e);
            }

            BatchItemOutcome {
                source_file,
                outcome,
            }
        });
        handles.push(handle);
    }

    // 等待全部任务完成，按提交顺序收集，保证输出顺序与输入一致
    let mut outcomes = Vec::with_capacity(total);
    for result in futures::future::join_all(handles).await {
        match result {
            Ok(item) => outcomes.push(item),
            Err(e) => {
                error!("批量任务执行失败: {}", e);
                outcomes.push(BatchItemOutcome {
                    source_file: String::new(),
                    outcome: Err(LabelError::unavailable("batch", e)),
                });
            }
        }
    }

    let success = outcomes.iter().filter(|o| o.outcome.is_ok()).count();
    info!("📦 批量翻译完成: 成功 {}/{}", success, total);

    Ok(outcomes)
}

