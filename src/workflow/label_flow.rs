//! 标签处理流程 - 流程层
//!
//! 核心职责：定义"一张标签图片"的完整处理流程
//!
//! 流程顺序：
//! 1. 输入检查（不合法则在任何远程调用之前拒绝，不写审计记录）
//! 2. 远程流水线（OCR → 结构化 → 翻译 → 渲染）
//! 3. 验证模式下再提交 RAG 规制验证
//! 4. 无论成败写入恰好一条审计记录，然后返回结果或包装后的错误
//!
//! 审计写入挂在内部结果的唯一一次 match 上，任何提前 `?` 都绕不开它；
//! 审计本身失败只记日志，不改变调用方看到的结果。

use std::sync::Arc;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{error, info};

use crate::clients::{ProcessingClient, ValidationClient};
use crate::error::{LabelError, Result};
use crate::models::{
    AuditRecord, AuditStatus, ImageFile, PipelineResult, ProcessingRequest, ProcessingType,
    ValidationResult,
};
use crate::services::AuditRecorder;
use crate::workflow::LabelCtx;

static COUNTRY_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,3}$").expect("国家代码正则不合法"));

/// 标签处理流程
///
/// - 只处理单张图片
/// - 不出现 Vec<ImageFile>
/// - 批量与多国家扇出由编排层负责
pub struct LabelFlow {
    processing: Arc<dyn ProcessingClient>,
    validation: Arc<dyn ValidationClient>,
    audit: Arc<dyn AuditRecorder>,
}

impl LabelFlow {
    /// 创建新的标签处理流程
    pub fn new(
        processing: Arc<dyn ProcessingClient>,
        validation: Arc<dyn ValidationClient>,
        audit: Arc<dyn AuditRecorder>,
    ) -> Self {
        Self {
            processing,
            validation,
            audit,
        }
    }

    /// 规制验证：完整流水线 + RAG 验证
    pub async fn run_validate(
        &self,
        username: &str,
        image: ImageFile,
        country: &str,
    ) -> Result<ValidationResult> {
        let country = check_input(&image, country)?;
        let ctx = LabelCtx::new(username, &image.file_name, &country);
        info!("🔍 {} 开始规制验证 (用户: {})", ctx, username);

        let outcome = self.validate_inner(&ctx, image).await;

        let record = match &outcome {
            Ok(result) => AuditRecord::now(
                ProcessingType::Validate,
                &ctx.file_name,
                AuditStatus::Completed,
                result.total_errors,
                result.warning_count(),
                &ctx.country,
            ),
            Err(e) => {
                error!("❌ {} 验证失败: {}", ctx, e);
                AuditRecord::now(
                    ProcessingType::Validate,
                    &ctx.file_name,
                    AuditStatus::Failed,
                    0,
                    0,
                    &ctx.country,
                )
            }
        };
        self.write_audit(&ctx.username, record).await;

        outcome.map_err(|e| wrap_remote("validate", e))
    }

    /// 翻译：完整流水线，仅返回渲染后的 HTML
    pub async fn run_translate(
        &self,
        username: &str,
        image: ImageFile,
        country: &str,
    ) -> Result<String> {
        let result = self.run_translate_detailed(username, image, country).await?;
        Ok(result.html_output)
    }

    /// 详细翻译：完整流水线，返回各阶段耗时 + 结构化字段 + HTML
    pub async fn run_translate_detailed(
        &self,
        username: &str,
        image: ImageFile,
        country: &str,
    ) -> Result<PipelineResult> {
        let country = check_input(&image, country)?;
        let ctx = LabelCtx::new(username, &image.file_name, &country);
        info!("🌍 {} 开始翻译 (用户: {})", ctx, username);

        let outcome = self.translate_inner(&ctx, image).await;

        // 翻译模式不产生问题计数
        let (status, error_count, warning_count) = match &outcome {
            Ok(_) => (AuditStatus::Completed, 0, 0),
            Err(e) => {
                error!("❌ {} 翻译失败: {}", ctx, e);
                (AuditStatus::Failed, 0, 0)
            }
        };
        let record = AuditRecord::now(
            ProcessingType::Translate,
            &ctx.file_name,
            status,
            error_count,
            warning_count,
            &ctx.country,
        );
        self.write_audit(&ctx.username, record).await;

        outcome.map_err(|e| wrap_remote("translate", e))
    }

    async fn validate_inner(&self, ctx: &LabelCtx, image: ImageFile) -> Result<ValidationResult> {
        let request = ProcessingRequest::new(image, &ctx.country, true);
        let pipeline = self.processing.run_full_pipeline(&request).await?;
        info!(
            "✓ {} 流水线完成 - OCR: {:.1}s, 结构化: {:.1}s, 翻译: {:.1}s",
            ctx,
            pipeline.processing_time.ocr_time,
            pipeline.processing_time.structure_time,
            pipeline.processing_time.translate_time
        );

        let validation = self.validation.validate(&pipeline.html_output).await?;
        info!(
            "✓ {} 验证完成: 共 {} 个问题 (error: {}, warning: {})",
            ctx,
            validation.total_errors,
            validation.error_count(),
            validation.warning_count()
        );
        Ok(validation)
    }

    async fn translate_inner(&self, ctx: &LabelCtx, image: ImageFile) -> Result<PipelineResult> {
        let request = ProcessingRequest::new(image, &ctx.country, true);
        let result = self.processing.run_full_pipeline(&request).await?;
        info!(
            "✓ {} 翻译完成，耗时 {:.1}s",
            ctx, result.processing_time.total_time
        );
        Ok(result)
    }

    /// 审计写入失败只记日志，不改变处理结果
    async fn write_audit(&self, username: &str, record: AuditRecord) {
        if let Err(e) = self.audit.record(username, record).await {
            error!("审计记录写入失败（已忽略）: {}", e);
        }
    }
}

/// 输入检查：图片格式与国家代码
///
/// 返回统一为大写的国家代码；不合法输入在任何远程调用之前拒绝。
pub fn check_input(image: &ImageFile, country: &str) -> Result<String> {
    if image.bytes.is_empty() {
        return Err(LabelError::invalid_input(format!(
            "上传文件为空: {}",
            image.file_name
        )));
    }
    if !image.is_supported_image() {
        return Err(LabelError::invalid_input(format!(
            "不支持的图片格式: {}（仅支持 PNG / JPEG / WebP）",
            image.file_name
        )));
    }

    normalize_country(country)
}

/// 国家代码检查：统一为大写，要求 2-3 位字母
pub fn normalize_country(country: &str) -> Result<String> {
    let normalized = country.trim().to_uppercase();
    if !COUNTRY_CODE.is_match(&normalized) {
        return Err(LabelError::invalid_input(format!(
            "国家代码格式不合法: {}",
            country
        )));
    }
    Ok(normalized)
}

/// 远程调用失败统一包装为"服务不可用"；输入错误原样透传
pub fn wrap_remote(stage: &str, err: LabelError) -> LabelError {
    if err.is_invalid_input() {
        err
    } else {
        LabelError::unavailable(stage, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png_image(name: &str) -> ImageFile {
        let mut b = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        b.extend_from_slice(&[0u8; 16]);
        ImageFile::new(name, b)
    }

    #[test]
    fn test_check_input_normalizes_country() {
        assert_eq!(check_input(&png_image("a.png"), "usa").unwrap(), "USA");
        assert_eq!(check_input(&png_image("a.png"), " jpn ").unwrap(), "JPN");
    }

    #[test]
    fn test_normalize_country() {
        assert_eq!(normalize_country("kr").unwrap(), "KR");
        assert!(normalize_country("united states").unwrap_err().is_invalid_input());
        assert!(normalize_country("").unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_check_input_rejects_bad_country() {
        let err = check_input(&png_image("a.png"), "united states").unwrap_err();
        assert!(err.is_invalid_input());

        let err = check_input(&png_image("a.png"), "U1").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_check_input_rejects_bad_image() {
        let err = check_input(&ImageFile::new("a.txt", b"plain text file".to_vec()), "USA")
            .unwrap_err();
        assert!(err.is_invalid_input());

        let err = check_input(&ImageFile::new("empty.png", Vec::new()), "USA").unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_wrap_remote_keeps_invalid_input() {
        let err = wrap_remote("validate", LabelError::invalid_input("bad"));
        assert!(err.is_invalid_input());

        let err = wrap_remote("validate", LabelError::unavailable("pipeline", "timeout"));
        assert!(err.is_unavailable());
        assert!(err.to_string().contains("validate"));
    }
}
