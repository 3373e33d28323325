//! 统一错误类型定义

use thiserror::Error;
use voltz_checkout_core::CoreError;

/// Probe error type
#[derive(Error, Debug)]
pub enum ProbeError {
    /// 输入无法探测 (e.g. not a valid TLS server name)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// 网络错误
    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Probe Result 类型别名
pub type ProbeResult<T> = std::result::Result<T, ProbeError>;

impl From<ProbeError> for CoreError {
    fn from(err: ProbeError) -> Self {
        Self::VerificationError(err.to_string())
    }
}
