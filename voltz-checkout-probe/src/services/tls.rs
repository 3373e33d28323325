//! TLS certificate probe
//!
//! Uses rustls with the webpki root set, so a completed handshake already implies
//! a trusted chain for the server name.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace, warn};
use rustls::crypto::CryptoProvider;
use rustls::{ClientConfig, RootCertStore};
use rustls_pki_types::ServerName;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

use crate::error::{ProbeError, ProbeResult};

/// Initialize the rustls `CryptoProvider` (once).
///
/// `install_default` returns `Err` only when a provider is already installed.
fn ensure_crypto_provider() {
    let _ = CryptoProvider::install_default(rustls::crypto::ring::default_provider());
}

/// Whether `host:port` serves a valid certificate for `host`.
///
/// Connection and handshake failures are `Ok(false)`; only a host that cannot be
/// used as a TLS server name is an error.
pub(crate) async fn certificate_active(
    host: &str,
    port: u16,
    connect_timeout: Duration,
    handshake_timeout: Duration,
) -> ProbeResult<bool> {
    ensure_crypto_provider();

    let server_name = ServerName::try_from(host.to_string())
        .map_err(|_| ProbeError::ValidationError(format!("Invalid TLS server name: {host}")))?;

    debug!("[TLS] Probing {host}:{port}");
    let start_time = std::time::Instant::now();

    let stream = match timeout(connect_timeout, TcpStream::connect((host, port))).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => {
            warn!("[TLS] TCP connection to {host}:{port} failed: {e}");
            return Ok(false);
        }
        Err(_) => {
            warn!(
                "[TLS] TCP connection to {host}:{port} timed out ({}s)",
                connect_timeout.as_secs()
            );
            return Ok(false);
        }
    };
    trace!("[TLS] TCP connected in {:?}", start_time.elapsed());

    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    let config = ClientConfig::builder()
        .with_root_certificates(root_store)
        .with_no_client_auth();
    let connector = TlsConnector::from(Arc::new(config));

    let tls_stream = match timeout(handshake_timeout, connector.connect(server_name, stream)).await {
        Ok(Ok(s)) => s,
        Ok(Err(e)) => {
            warn!("[TLS] Handshake with {host} failed: {e}");
            return Ok(false);
        }
        Err(_) => {
            warn!(
                "[TLS] Handshake with {host} timed out ({}s)",
                handshake_timeout.as_secs()
            );
            return Ok(false);
        }
    };

    let (_, tls_conn) = tls_stream.get_ref();
    let Some(leaf) = tls_conn.peer_certificates().and_then(|certs| certs.first()) else {
        warn!("[TLS] {host} presented no certificate");
        return Ok(false);
    };

    let (_, cert) = match X509Certificate::from_der(leaf.as_ref()) {
        Ok(c) => c,
        Err(e) => {
            warn!("[TLS] Certificate of {host} could not be parsed: {e}");
            return Ok(false);
        }
    };

    let active = leaf_is_active(host, &cert);
    debug!(
        "[TLS] {host}: certificate active={active}, took {:?}",
        start_time.elapsed()
    );
    Ok(active)
}

/// Leaf certificate is inside its validity window and names the host
fn leaf_is_active(host: &str, cert: &X509Certificate<'_>) -> bool {
    if !cert.validity().is_valid() {
        return false;
    }

    let cn = cert
        .subject()
        .iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok());

    let san: Vec<String> = cert
        .subject_alternative_name()
        .ok()
        .flatten()
        .map(|ext| {
            ext.value
                .general_names
                .iter()
                .filter_map(|name| match name {
                    x509_parser::extensions::GeneralName::DNSName(dns) => {
                        Some((*dns).to_string())
                    }
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default();

    names_match(host, cn, &san)
}

/// Check whether the host matches the certificate's CN or SANs.
fn names_match(host: &str, cn: Option<&str>, san: &[String]) -> bool {
    let host = host.to_lowercase();
    cn.into_iter()
        .chain(san.iter().map(String::as_str))
        .any(|name| matches_domain(&host, &name.to_lowercase()))
}

/// Domain matching with wildcard support.
fn matches_domain(query: &str, pattern: &str) -> bool {
    if query == pattern {
        return true;
    }

    // *.example.com 只匹配一级子域名
    if let Some(suffix) = pattern.strip_prefix("*.") {
        if let Some(prefix) = query.strip_suffix(suffix) {
            if let Some(label) = prefix.strip_suffix('.') {
                return !label.is_empty() && !label.contains('.');
            }
        }
    }

    false
}
