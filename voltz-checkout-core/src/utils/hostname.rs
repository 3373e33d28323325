//! Hostname normalization and syntax checks for domain forms

use crate::error::{CoreError, CoreResult};

const MAX_HOSTNAME_LEN: usize = 253;
const MAX_LABEL_LEN: usize = 63;

/// Normalize user input into a bare hostname.
///
/// Trims whitespace, lowercases, strips a leading `http://`/`https://`, a trailing
/// path and a trailing dot.
#[must_use]
pub fn normalize(input: &str) -> String {
    let lowered = input.trim().to_ascii_lowercase();
    let without_scheme = lowered
        .strip_prefix("https://")
        .or_else(|| lowered.strip_prefix("http://"))
        .unwrap_or(&lowered);
    let host = without_scheme.split('/').next().unwrap_or_default();
    host.trim_end_matches('.').to_string()
}

/// Normalize and validate a hostname, returning the normalized form.
pub fn validate(input: &str) -> CoreResult<String> {
    let host = normalize(input);

    if host.is_empty() {
        return Err(CoreError::ValidationError(
            "Domain name cannot be empty".to_string(),
        ));
    }
    if host.len() > MAX_HOSTNAME_LEN {
        return Err(CoreError::ValidationError(format!(
            "Domain name cannot exceed {MAX_HOSTNAME_LEN} characters"
        )));
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return Err(CoreError::ValidationError(format!(
            "Invalid domain name: '{host}' (expected e.g. minhaloja.com)"
        )));
    }

    for label in &labels {
        if label.is_empty() || label.len() > MAX_LABEL_LEN {
            return Err(CoreError::ValidationError(format!(
                "Invalid domain name: '{host}'"
            )));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(CoreError::ValidationError(format!(
                "Invalid domain name: '{host}' (labels cannot start or end with '-')"
            )));
        }
        if !label
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(CoreError::ValidationError(format!(
                "Invalid domain name: '{host}' (unsupported characters)"
            )));
        }
    }

    // TLD must not be all digits (rules out bare IPv4 addresses)
    if labels
        .last()
        .is_some_and(|tld| tld.chars().all(|c| c.is_ascii_digit()))
    {
        return Err(CoreError::ValidationError(format!(
            "Invalid domain name: '{host}'"
        )));
    }

    Ok(host)
}
