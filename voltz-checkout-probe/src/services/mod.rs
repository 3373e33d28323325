//! Production domain verifier
//!
//! [`ProbeVerifier`] checks the two things the platform needs before a checkout
//! domain can go live:
//! 1. `<type>.<domain>` has a CNAME pointing at the platform hostname
//! 2. the same host answers TLS with a valid certificate for it

mod cname;
mod resolver;
#[cfg(feature = "rustls")]
mod tls;

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_resolver::TokioResolver;
use voltz_checkout_core::types::{Domain, DomainValidationResult};
use voltz_checkout_core::{Clock, CoreResult, DomainVerifier};

use crate::error::ProbeResult;

/// Hostname customer CNAME records must point at
pub const DEFAULT_CNAME_TARGET: &str = "checkout.voltz.app";

// Timeout constants
const DNS_TIMEOUT: Duration = Duration::from_secs(5);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const TLS_TIMEOUT: Duration = Duration::from_secs(5);

/// Probe settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeConfig {
    /// Expected CNAME target
    pub cname_target: String,
    /// Port the TLS probe connects to
    pub tls_port: u16,
    pub dns_timeout: Duration,
    pub connect_timeout: Duration,
    pub handshake_timeout: Duration,
    /// Query this nameserver instead of the system resolver
    pub nameserver: Option<IpAddr>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            cname_target: DEFAULT_CNAME_TARGET.to_string(),
            tls_port: 443,
            dns_timeout: DNS_TIMEOUT,
            connect_timeout: CONNECT_TIMEOUT,
            handshake_timeout: TLS_TIMEOUT,
            nameserver: None,
        }
    }
}

impl ProbeConfig {
    #[must_use]
    pub fn with_cname_target(mut self, target: impl Into<String>) -> Self {
        self.cname_target = target.into();
        self
    }

    #[must_use]
    pub fn with_nameserver(mut self, nameserver: Option<IpAddr>) -> Self {
        self.nameserver = nameserver;
        self
    }

    #[must_use]
    pub fn with_tls_port(mut self, port: u16) -> Self {
        self.tls_port = port;
        self
    }
}

/// `DomainVerifier` backed by real DNS and TLS checks
pub struct ProbeVerifier {
    config: ProbeConfig,
    resolver: TokioResolver,
    clock: Arc<dyn Clock>,
}

impl ProbeVerifier {
    #[must_use]
    pub fn new(config: ProbeConfig, clock: Arc<dyn Clock>) -> Self {
        let resolver = resolver::build_resolver(config.nameserver, config.dns_timeout);
        Self {
            config,
            resolver,
            clock,
        }
    }

    /// CNAME of `host` points at the configured target. Lookup failures count as
    /// "not verified".
    async fn check_dns(&self, host: &str) -> bool {
        match cname::lookup_cname(&self.resolver, host).await {
            Ok(found) => {
                let matched = cname::cname_matches(&found, &self.config.cname_target);
                if !matched {
                    log::info!(
                        "[PROBE] {host} CNAME {found:?} does not point at {}",
                        self.config.cname_target
                    );
                }
                matched
            }
            Err(e) => {
                log::warn!("[PROBE] {e}");
                false
            }
        }
    }

    #[cfg(feature = "rustls")]
    async fn check_tls(&self, host: &str) -> ProbeResult<bool> {
        tls::certificate_active(
            host,
            self.config.tls_port,
            self.config.connect_timeout,
            self.config.handshake_timeout,
        )
        .await
    }

    #[cfg(not(feature = "rustls"))]
    #[allow(clippy::unused_async)]
    async fn check_tls(&self, host: &str) -> ProbeResult<bool> {
        log::warn!("[PROBE] Built without TLS support; reporting {host} certificate as pending");
        Ok(false)
    }
}

#[async_trait]
impl DomainVerifier for ProbeVerifier {
    async fn verify(&self, domain: &Domain) -> CoreResult<DomainValidationResult> {
        let host = domain.checkout_host();

        let dns_verified = self.check_dns(&host).await;
        // 证书只会在 CNAME 生效后签发
        let ssl_active = if dns_verified {
            self.check_tls(&host).await?
        } else {
            false
        };

        log::debug!("[PROBE] {host}: dns_verified={dns_verified}, ssl_active={ssl_active}");
        Ok(DomainValidationResult {
            dns_verified,
            ssl_active,
            last_checked: self.clock.now(),
        })
    }
}
