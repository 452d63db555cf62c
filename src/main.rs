use anyhow::Result;

use label_pipeline::app::App;
use label_pipeline::config::Config;
use label_pipeline::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置（可选 TOML 文件，环境变量覆盖）
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path)?,
        None => Config::from_env(),
    };

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
