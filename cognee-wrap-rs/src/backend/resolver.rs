//! Backend resolution
//!
//! Decides, once per decorated model, which adapter variant a set of
//! connection options binds to. Hosted-shaped endpoints are bound directly;
//! anything else is probed through the unauthenticated health endpoint and
//! matched to a registered self-hosted variant by version. Detection
//! failures degrade to the hosted adapter only when a credential makes that
//! meaningful; otherwise resolution fails rather than guessing.

use std::time::Duration;

use reqwest::Url;
use semver::Version;
use tracing::{debug, info, warn};

use super::{CogneeBackend, HostedBackend, V040Backend};
use crate::errors::{CogneeError, Result};
use crate::types::CogneeOptions;

/// Default endpoint when no base URL is configured.
pub const HOSTED_BASE_URL: &str = "https://api.cognee.ai";

/// Apex domain of the hosted service.
const HOSTED_DOMAIN: &str = "cognee.ai";

/// Probes must not hang a model's first call.
const PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Self-hosted versions with a registered adapter, oldest first.
fn registered_versions() -> Vec<Version> {
    vec![Version::new(0, 4, 0)]
}

/// Resolve connection options to a concrete backend handle.
///
/// Performs at most one outbound probe; the caller is expected to memoize
/// the returned handle for the lifetime of the decorated model.
pub async fn resolve(options: &CogneeOptions) -> Result<CogneeBackend> {
    let base_url = options
        .base_url
        .clone()
        .unwrap_or_else(|| HOSTED_BASE_URL.to_string());

    let url = Url::parse(&base_url)
        .map_err(|e| CogneeError::config(format!("invalid endpoint URL `{base_url}`: {e}")))?;

    if is_hosted_host(&url) {
        let backend = hosted_handle(options, &base_url)?;
        info!(endpoint = %base_url, "bound hosted backend");
        return Ok(backend);
    }

    match probe_health(&base_url).await {
        Ok(Some(detected)) => {
            let selected = select_variant(&detected);
            if selected != detected {
                warn!(
                    detected = %detected,
                    selected = %selected,
                    "no exact adapter for detected version; using compatibility fallback"
                );
            }
            let adapter = V040Backend::new(&base_url, options.api_key.as_deref(), &options.headers)?;
            info!(endpoint = %base_url, version = %detected, "bound self-hosted v0.4.0 backend");
            Ok(CogneeBackend::SelfHostedV040 { detected, adapter })
        }
        Ok(None) => fall_back_to_hosted(
            options,
            &base_url,
            "endpoint is healthy but reported no parseable version",
        ),
        Err(error) => fall_back_to_hosted(
            options,
            &base_url,
            &format!("health probe failed: {error}"),
        ),
    }
}

/// Whether the URL points at the hosted service's domain set.
fn is_hosted_host(url: &Url) -> bool {
    match url.host_str() {
        Some(host) => {
            host == HOSTED_DOMAIN || host.ends_with(&format!(".{HOSTED_DOMAIN}"))
        }
        None => false,
    }
}

/// Build a hosted handle, requiring a credential.
fn hosted_handle(options: &CogneeOptions, base_url: &str) -> Result<CogneeBackend> {
    let api_key = options.api_key.as_deref().ok_or_else(|| {
        CogneeError::config("the hosted cognee backend requires an API key")
    })?;
    Ok(CogneeBackend::Hosted(HostedBackend::new(
        base_url,
        api_key,
        &options.headers,
    )?))
}

/// Inconclusive detection: hosted with a credential, terminal without one.
fn fall_back_to_hosted(
    options: &CogneeOptions,
    base_url: &str,
    reason: &str,
) -> Result<CogneeBackend> {
    if options.api_key.is_none() {
        return Err(CogneeError::undetermined(format!(
            "{reason}, and no API key is configured for a hosted fallback"
        )));
    }
    warn!(endpoint = %base_url, reason, "backend detection inconclusive; assuming hosted");
    hosted_handle(options, base_url)
}

/// Probe the well-known health path.
///
/// `Ok(Some(version))` for a healthy endpoint with a parseable version,
/// `Ok(None)` for a healthy endpoint without one, `Err` for anything the
/// caller should treat as inconclusive.
async fn probe_health(base_url: &str) -> Result<Option<Version>> {
    let client = reqwest::Client::builder()
        .timeout(PROBE_TIMEOUT)
        .build()?;

    let url = format!("{}/health", base_url.trim_end_matches('/'));
    debug!(%url, "probing backend health");

    let response = client.get(&url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CogneeError::undetermined(format!(
            "health endpoint answered HTTP {status}"
        )));
    }

    let body = response.text().await?;
    Ok(parse_health_version(&body))
}

/// Pull a version token out of a health payload.
///
/// Expects a JSON object with a `version` field, but tolerates a bare JSON
/// string or a plain-text body.
fn parse_health_version(body: &str) -> Option<Version> {
    match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => {
            map.get("version").and_then(|v| v.as_str()).and_then(leading_version)
        }
        Ok(serde_json::Value::String(text)) => leading_version(&text),
        _ => leading_version(body.trim()),
    }
}

/// Parse a leading `MAJOR.MINOR.PATCH` token, ignoring any suffix
/// (`0.4.0-dev`, `0.4.0+build`, `v0.4.0`).
fn leading_version(text: &str) -> Option<Version> {
    let text = text.trim().trim_start_matches('v');
    let end = text
        .find(|c: char| !c.is_ascii_digit() && c != '.')
        .unwrap_or(text.len());
    let mut parts = text[..end].split('.');

    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    Some(Version::new(major, minor, patch))
}

/// Select the adapter version for a detected deployment version: the exact
/// match if registered, else the closest older registered version, else the
/// oldest registered one.
fn select_variant(detected: &Version) -> Version {
    let registered = registered_versions();
    registered
        .iter()
        .rev()
        .find(|candidate| *candidate <= detected)
        .cloned()
        // Deployments older than anything registered still get the oldest
        // adapter rather than a hard failure.
        .unwrap_or_else(|| registered[0].clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_hosted_host() {
        assert!(is_hosted_host(&Url::parse("https://api.cognee.ai").unwrap()));
        assert!(is_hosted_host(&Url::parse("https://cognee.ai/api").unwrap()));
        assert!(is_hosted_host(&Url::parse("https://eu.api.cognee.ai").unwrap()));
        assert!(!is_hosted_host(&Url::parse("https://notcognee.ai").unwrap()));
        assert!(!is_hosted_host(&Url::parse("http://localhost:8000").unwrap()));
        assert!(!is_hosted_host(&Url::parse("http://127.0.0.1:8000").unwrap()));
    }

    #[test]
    fn test_leading_version() {
        assert_eq!(leading_version("0.4.0"), Some(Version::new(0, 4, 0)));
        assert_eq!(leading_version("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(leading_version("0.4.0-dev"), Some(Version::new(0, 4, 0)));
        assert_eq!(leading_version("0.5.2+build.7"), Some(Version::new(0, 5, 2)));
        assert_eq!(leading_version("  2.0.1 "), Some(Version::new(2, 0, 1)));
        assert_eq!(leading_version("1.2.3.4"), Some(Version::new(1, 2, 3)));
        assert_eq!(leading_version("0.4"), None);
        assert_eq!(leading_version("latest"), None);
        assert_eq!(leading_version(""), None);
    }

    #[test]
    fn test_parse_health_version() {
        assert_eq!(
            parse_health_version(r#"{"version":"0.4.0"}"#),
            Some(Version::new(0, 4, 0))
        );
        assert_eq!(
            parse_health_version(r#"{"status":"ok","version":"0.5.2-rc.1"}"#),
            Some(Version::new(0, 5, 2))
        );
        assert_eq!(
            parse_health_version(r#""0.4.0""#),
            Some(Version::new(0, 4, 0))
        );
        assert_eq!(parse_health_version("0.4.0"), Some(Version::new(0, 4, 0)));
        assert_eq!(parse_health_version(r#"{"status":"ok"}"#), None);
        assert_eq!(parse_health_version("OK"), None);
    }

    #[test]
    fn test_select_variant() {
        // Exact match.
        assert_eq!(select_variant(&Version::new(0, 4, 0)), Version::new(0, 4, 0));
        // Newer deployment falls back to the closest older adapter.
        assert_eq!(select_variant(&Version::new(0, 5, 2)), Version::new(0, 4, 0));
        assert_eq!(select_variant(&Version::new(1, 0, 0)), Version::new(0, 4, 0));
        // Older-than-everything deployment gets the oldest adapter.
        assert_eq!(select_variant(&Version::new(0, 3, 9)), Version::new(0, 4, 0));
    }
}
