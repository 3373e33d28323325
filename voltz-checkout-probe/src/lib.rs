//! Network verifier for Voltz checkout domains
//!
//! 提供 [`ProbeVerifier`]：`DomainVerifier` 的生产实现。它解析
//! `<type>.<domain>` 的 CNAME 记录并与平台目标比较，然后通过 TLS 握手检查证书。
//! 网络故障被视为"未通过"，而不是错误。

mod error;
mod services;

pub use error::{ProbeError, ProbeResult};
pub use services::{ProbeConfig, ProbeVerifier, DEFAULT_CNAME_TARGET};
