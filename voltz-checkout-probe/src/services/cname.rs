//! CNAME 检查

use hickory_resolver::proto::rr::RecordType;
use hickory_resolver::TokioResolver;

use crate::error::{ProbeError, ProbeResult};

/// Resolve the CNAME targets published for `host`.
///
/// A missing record (NXDOMAIN or no CNAME) is an empty list; anything else the
/// resolver reports (timeouts, SERVFAIL) is a `NetworkError`.
pub(crate) async fn lookup_cname(resolver: &TokioResolver, host: &str) -> ProbeResult<Vec<String>> {
    match resolver.lookup(host, RecordType::CNAME).await {
        Ok(response) => Ok(response
            .record_iter()
            .filter_map(|record| record.data().as_cname())
            .map(|cname| normalize(&cname.0.to_string()))
            .collect()),
        Err(e) if e.is_no_records_found() || e.is_nx_domain() => {
            log::debug!("[CNAME] No CNAME published for {host}");
            Ok(Vec::new())
        }
        Err(e) => Err(ProbeError::NetworkError(format!(
            "CNAME lookup for {host} failed: {e}"
        ))),
    }
}

/// Whether one of the published targets is the expected one
pub(crate) fn cname_matches(found: &[String], expected: &str) -> bool {
    let expected = normalize(expected);
    !expected.is_empty() && found.iter().any(|target| normalize(target) == expected)
}

fn normalize(name: &str) -> String {
    name.trim().trim_end_matches('.').to_ascii_lowercase()
}
