//! 多国家扇出处理器 - 编排层
//!
//! 与批量模式不同，这里手工拆分流水线：OCR 和结构化只执行一次，
//! 然后各目标国家独立地 翻译 → 渲染。这是本路径区别于批量模式的
//! 关键优化——共享阶段的结果在所有国家之间复用。
//!
//! 失败语义：
//! - 共享阶段（OCR / 结构化）失败 → 整个调用失败（服务不可用）
//! - 单个国家的翻译或渲染失败 → 记日志并从结果中剔除该国家，
//!   其余国家不受影响，调用本身仍然成功

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{error, info, warn};

use crate::clients::ProcessingClient;
use crate::error::{LabelError, Result};
use crate::models::{country, ImageFile};
use crate::workflow::label_flow::{check_input, normalize_country, wrap_remote};

/// 单次扇出调用的国家数上限
pub const MAX_FANOUT_COUNTRIES: usize = 10;

/// 多国家扇出结果
///
/// 成功的国家进入 `html_outputs`，失败的国家列入 `failed_countries`，
/// 两个集合的键均为统一大写后的国家代码。
#[derive(Debug, Default)]
pub struct FanoutOutcome {
    pub html_outputs: HashMap<String, String>,
    pub failed_countries: Vec<String>,
}

/// 多国家翻译扇出
pub(crate) async fn run(
    processing: Arc<dyn ProcessingClient>,
    username: &str,
    image: ImageFile,
    countries: &[String],
    max_concurrent: usize,
) -> Result<FanoutOutcome> {
    if countries.is_empty() {
        return Err(LabelError::invalid_input("目标国家列表为空"));
    }
    if countries.len() > MAX_FANOUT_COUNTRIES {
        return Err(LabelError::invalid_input(format!(
            "最多支持 {} 个目标国家，收到 {} 个",
            MAX_FANOUT_COUNTRIES,
            countries.len()
        )));
    }

    // 所有国家代码在任何远程调用之前统一检查并去重（大小写不敏感）
    let mut normalized: Vec<String> = Vec::with_capacity(countries.len());
    for code in countries {
        let code = normalize_country(code)?;
        if !normalized.contains(&code) {
            normalized.push(code);
        }
    }
    // 图片本身不合法也在远程调用之前拒绝
    check_input(&image, &normalized[0])?;

    info!(
        "🌍 开始多国家翻译: {} → [{}] (用户: {})",
        image.file_name,
        normalized
            .iter()
            .map(|c| country::country_label(c))
            .collect::<Vec<_>>()
            .join(", "),
        username
    );

    // 共享阶段：OCR + 结构化，只执行一次；失败则整个调用失败
    let ocr = processing
        .extract_text(&image)
        .await
        .map_err(|e| wrap_remote("ocr", e))?;
    info!(
        "✓ OCR 完成: {} 段文本, 语言 {}",
        ocr.texts.len(),
        ocr.language
    );

    let structured = processing
        .structure_data(&ocr.texts, &ocr.language)
        .await
        .map_err(|e| wrap_remote("structure", e))?;
    info!("✓ 结构化完成");

    // 各国家独立地 翻译 → 渲染
    let semaphore = Arc::new(Semaphore::new(max_concurrent.max(1)));
    let mut handles = Vec::with_capacity(normalized.len());

    for target in &normalized {
        let permit = semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| LabelError::unavailable("fanout", e))?;

        let processing = processing.clone();
        let task_country = target.clone();
        let language = ocr.language.clone();
        let data = structured.data.clone();

        let handle = tokio::spawn(async move {
            let _permit = permit;
            let translated = processing.translate(&data, &language, &task_country).await?;
            let label_data = serde_json::to_value(&translated.translated_data)
                .map_err(|e| LabelError::unavailable("render", e))?;
            let html = processing.render_html(&task_country, &label_data).await?;
            Ok::<String, LabelError>(html)
        });
        handles.push(handle);
    }

    let mut outcome = FanoutOutcome::default();
    let results = futures::future::join_all(handles).await;
    for (target, result) in normalized.into_iter().zip(results) {
        match result {
            Ok(Ok(html)) => {
                info!("✓ {} 翻译渲染完成", country::country_label(&target));
                outcome.html_outputs.insert(target, html);
            }
            Ok(Err(e)) => {
                warn!("⚠️ {} 翻译失败，已从结果中剔除: {}", country::country_label(&target), e);
                outcome.failed_countries.push(target);
            }
            Err(e) => {
                error!("{} 扇出任务执行失败: {}", target, e);
                outcome.failed_countries.push(target);
            }
        }
    }

    info!(
        "🌍 多国家翻译完成: 成功 {}/{}",
        outcome.html_outputs.len(),
        outcome.html_outputs.len() + outcome.failed_countries.len()
    );

    Ok(outcome)
}
