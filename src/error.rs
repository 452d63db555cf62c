//! 应用程序错误类型
//!
//! 错误分为三大类：
//! - `InvalidInput`：请求本身不合法，在发起任何远程调用之前拒绝
//! - `Api` / `Unavailable`：远程服务调用失败（超时、非 2xx、熔断器打开）
//! - `Audit`：审计记录写入失败（由流程层吞掉并记录日志，不上抛给调用方）

use thiserror::Error;

/// 统一的 Result 别名
pub type Result<T> = std::result::Result<T, LabelError>;

/// 应用程序顶层错误
#[derive(Debug, Error)]
pub enum LabelError {
    /// 输入不合法（调用方应映射为 4xx）
    #[error("无效的请求: {reason}")]
    InvalidInput { reason: String },

    /// API 调用错误
    #[error(transparent)]
    Api(#[from] ApiError),

    /// 远程处理服务不可用（调用方应映射为 503）
    #[error("处理服务不可用 ({stage}): {message}")]
    Unavailable { stage: String, message: String },

    /// 审计记录写入失败
    #[error("审计记录写入失败: {message}")]
    Audit { message: String },
}

impl LabelError {
    /// 构造输入错误
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        LabelError::InvalidInput {
            reason: reason.into(),
        }
    }

    /// 将任意远程错误包装为"服务不可用"
    pub fn unavailable(stage: impl Into<String>, err: impl std::fmt::Display) -> Self {
        LabelError::Unavailable {
            stage: stage.into(),
            message: err.to_string(),
        }
    }

    /// 是否为输入错误（不应写审计记录、不应计入熔断器）
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, LabelError::InvalidInput { .. })
    }

    /// 是否为远程服务不可用类错误
    pub fn is_unavailable(&self) -> bool {
        matches!(self, LabelError::Unavailable { .. } | LabelError::Api(_))
    }
}

/// API 调用错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 网络请求失败
    #[error("API请求失败 ({endpoint}): {source}")]
    RequestFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// API 返回错误响应
    #[error("API返回错误响应 ({endpoint}): status={status}, message={message:?}")]
    BadResponse {
        endpoint: String,
        status: u16,
        message: Option<String>,
    },

    /// API 返回空结果
    #[error("API返回空结果: {endpoint}")]
    EmptyResponse { endpoint: String },

    /// 响应解析失败
    #[error("响应解析失败 ({endpoint}): {source}")]
    JsonParseFailed {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    /// 熔断器处于打开状态，请求被直接拒绝
    #[error("熔断器已打开，拒绝请求: {endpoint}")]
    CircuitOpen { endpoint: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_classification() {
        let err = LabelError::invalid_input("批量上限为 20 个文件");
        assert!(err.is_invalid_input());
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_unavailable_classification() {
        let err = LabelError::unavailable("pipeline", "connection refused");
        assert!(err.is_unavailable());
        assert!(!err.is_invalid_input());

        let err = LabelError::Api(ApiError::CircuitOpen {
            endpoint: "/api/pipeline".to_string(),
        });
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_error_display() {
        let err = LabelError::unavailable("ocr", "timeout");
        assert!(err.to_string().contains("ocr"));
        assert!(err.to_string().contains("timeout"));
    }
}
