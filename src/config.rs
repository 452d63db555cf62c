use serde::Deserialize;

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Food Label API 基础地址
    pub pipeline_api_base_url: String,
    /// RAG 验证 API 基础地址
    pub rag_api_base_url: String,
    /// 单次远程请求超时时间（秒）
    pub request_timeout_secs: u64,
    /// 健康探测超时时间（秒）
    pub health_timeout_secs: u64,
    /// 同时发出的远程请求数量上限
    pub max_concurrent_requests: usize,
    /// 默认目标国家
    pub default_country: String,
    /// 处理后端（目前仅支持 "pipeline"）
    pub processing_backend: String,
    /// 熔断器连续失败阈值
    pub breaker_failure_threshold: u32,
    /// 熔断器打开后的冷却时间（秒）
    pub breaker_open_secs: u64,
    /// 审计记录文件路径
    pub audit_log_file: String,
    /// 待处理图片目录（演示程序用）
    pub input_folder: String,
    /// HTML 输出目录（演示程序用）
    pub output_folder: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pipeline_api_base_url: "http://localhost:8001".to_string(),
            rag_api_base_url: "http://localhost:8002".to_string(),
            request_timeout_secs: 120,
            health_timeout_secs: 5,
            max_concurrent_requests: 5,
            default_country: "USA".to_string(),
            processing_backend: "pipeline".to_string(),
            breaker_failure_threshold: 5,
            breaker_open_secs: 30,
            audit_log_file: "audit.jsonl".to_string(),
            input_folder: "input_images".to_string(),
            output_folder: "output_html".to_string(),
            verbose_logging: false,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            pipeline_api_base_url: std::env::var("PIPELINE_API_BASE_URL").unwrap_or(default.pipeline_api_base_url),
            rag_api_base_url: std::env::var("RAG_API_BASE_URL").unwrap_or(default.rag_api_base_url),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            health_timeout_secs: std::env::var("HEALTH_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.health_timeout_secs),
            max_concurrent_requests: std::env::var("MAX_CONCURRENT_REQUESTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_concurrent_requests),
            default_country: std::env::var("DEFAULT_COUNTRY").unwrap_or(default.default_country),
            processing_backend: std::env::var("PROCESSING_BACKEND").unwrap_or(default.processing_backend),
            breaker_failure_threshold: std::env::var("BREAKER_FAILURE_THRESHOLD").ok().and_then(|v| v.parse().ok()).unwrap_or(default.breaker_failure_threshold),
            breaker_open_secs: std::env::var("BREAKER_OPEN_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.breaker_open_secs),
            audit_log_file: std::env::var("AUDIT_LOG_FILE").unwrap_or(default.audit_log_file),
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(default.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(default.output_folder),
            verbose_logging: std::env::var("VERBOSE_LOGGING").ok().and_then(|v| v.parse().ok()).unwrap_or(default.verbose_logging),
        }
    }

    /// 从 TOML 配置文件加载
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.default_country, "USA");
        assert_eq!(config.max_concurrent_requests, 5);
        assert_eq!(config.processing_backend, "pipeline");
    }

    #[test]
    fn test_from_toml() {
        let toml_str = r#"
            pipeline_api_base_url = "http://api.example.com"
            default_country = "KOR"
            max_concurrent_requests = 3
        "#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.pipeline_api_base_url, "http://api.example.com");
        assert_eq!(config.default_country, "KOR");
        assert_eq!(config.max_concurrent_requests, 3);
        // 未出现的字段回落到默认值
        assert_eq!(config.breaker_failure_threshold, 5);
    }
}
