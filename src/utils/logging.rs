//! 日志工具模块
//!
//! 提供日志初始化和输出的辅助函数

use tracing::info;
use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 级别可通过 `RUST_LOG` 环境变量覆盖，默认 info。
/// 重复调用安全（测试中每个用例都会尝试初始化一次）。
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(max_concurrent: usize, default_country: &str) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 标签批量翻译模式");
    info!("📊 最大并发数: {}", max_concurrent);
    info!("🌍 默认目标国家: {}", default_country);
    info!("{}", "=".repeat(60));
}

/// 记录待处理文件加载信息
pub fn log_images_loaded(total: usize, max_concurrent: usize) {
    info!("✓ 找到 {} 个待处理的图片", total);
    info!("📋 将以并发上限 {} 的方式处理\n", max_concurrent);
}

/// 打印最终统计信息
pub fn print_final_stats(success: usize, failed: usize, total: usize, output_folder: &str) {
    info!("\n{}", "=".repeat(60));
    info!("📊 全部处理完成统计");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    info!("✅ 成功: {}/{}", success, total);
    info!("❌ 失败: {}", failed);
    info!("{}", "=".repeat(60));
    info!("\nHTML 已输出至: {}", output_folder);
}

/// 截断长文本用于日志显示
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("短文本", 10), "短文本");
        assert_eq!(truncate_text("hello world", 5), "hello...");
    }
}
