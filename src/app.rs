//! 应用入口封装（演示程序用）
//!
//! 扫描待处理图片目录，按批（每批最多 20 个）调用批量翻译，
//! 把渲染结果写入输出目录并汇总统计。

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Config;
use crate::models::ImageFile;
use crate::orchestrator::{LabelOrchestrator, MAX_BATCH_SIZE};
use crate::utils::logging;

/// 应用主结构
pub struct App {
    config: Config,
    orchestrator: LabelOrchestrator,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::log_startup(config.max_concurrent_requests, &config.default_country);

        let orchestrator = LabelOrchestrator::from_config(&config)?;

        // 启动时输出一次远程服务状态
        let status = orchestrator.health_status().await;
        info!(
            "🩺 处理引擎: {} (熔断器: {})",
            if status.food_label_api_healthy {
                "可达"
            } else {
                "不可达"
            },
            status.circuit_breaker_state
        );

        Ok(Self {
            config,
            orchestrator,
        })
    }

    /// 运行应用主逻辑
    pub async fn run(&self) -> Result<()> {
        let images = self.load_images()?;
        if images.is_empty() {
            warn!("⚠️ 目录 {} 中没有待处理的图片，程序结束", self.config.input_folder);
            return Ok(());
        }

        let total = images.len();
        logging::log_images_loaded(total, self.config.max_concurrent_requests);

        fs::create_dir_all(&self.config.output_folder)
            .with_context(|| format!("无法创建输出目录 {}", self.config.output_folder))?;

        let username = std::env::var("USER").unwrap_or_else(|_| "local".to_string());
        let mut success = 0usize;
        let mut failed = 0usize;

        // 按上限分批提交
        for chunk in images.chunks(MAX_BATCH_SIZE) {
            let outcomes = self
                .orchestrator
                .translate_batch(&username, chunk.to_vec(), None)
                .await?;

            for item in outcomes {
                match item.outcome {
                    Ok(result) => {
                        self.write_output(&item.source_file, &result.html_output)?;
                        success += 1;
                    }
                    Err(_) => failed += 1,
                }
            }
        }

        logging::print_final_stats(success, failed, total, &self.config.output_folder);
        Ok(())
    }

    /// 扫描待处理图片
    fn load_images(&self) -> Result<Vec<ImageFile>> {
        info!("\n📁 正在扫描待处理的图片...");
        let dir = Path::new(&self.config.input_folder);
        if !dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut images = Vec::new();
        let mut entries: Vec<_> = fs::read_dir(dir)?.filter_map(|e| e.ok()).collect();
        entries.sort_by_key(|e| e.file_name());

        for entry in entries {
            let path = entry.path();
            let is_image = path
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "png" | "jpg" | "jpeg" | "webp"))
                .unwrap_or(false);
            if !is_image {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().to_string();
            let bytes =
                fs::read(&path).with_context(|| format!("读取文件失败: {}", path.display()))?;
            images.push(ImageFile::new(file_name, bytes));
        }
        Ok(images)
    }

    /// 写出单个文件的渲染结果
    fn write_output(&self, source_file: &str, html: &str) -> Result<()> {
        let stem = Path::new(source_file)
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| source_file.to_string());
        let out_path = Path::new(&self.config.output_folder)
            .join(format!("{}_{}.html", stem, self.config.default_country));
        fs::write(&out_path, html)
            .with_context(|| format!("写入输出失败: {}", out_path.display()))?;
        Ok(())
    }
}
