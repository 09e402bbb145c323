//! Backend dispatch layer
//!
//! Every memory operation goes through [`CogneeBackend`], a closed tagged
//! union over the wire-incompatible backend families: the hosted service
//! and versioned self-hosted deployments. The variant is chosen once by the
//! [`resolver`] and never changes for the lifetime of a decorated model;
//! call sites dispatch on the variant, never on version strings.

use std::collections::HashMap;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use semver::Version;
use serde_json::Value;

use crate::errors::{CogneeError, Result};

pub mod resolver;
mod types;

mod hosted;
mod v0_4;

pub use hosted::HostedBackend;
pub use resolver::resolve;
pub use types::{AddArgs, CognifyArgs, SearchArgs, SearchMode, extract_context};
pub use v0_4::V040Backend;

/// Which backend family a resolved handle dispatches to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// The vendor-operated hosted service
    Hosted,
    /// A self-hosted deployment speaking the v0.4.0 wire format
    SelfHostedV040,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hosted => write!(f, "hosted"),
            Self::SelfHostedV040 => write!(f, "self-hosted v0.4.0"),
        }
    }
}

/// A resolved backend handle
///
/// Produced once per decorated model by [`resolver::resolve`] and read-only
/// afterwards. Adding support for a new self-hosted version means adding a
/// variant here plus a selection rule in the resolver.
#[derive(Debug, Clone)]
pub enum CogneeBackend {
    /// Hosted service adapter
    Hosted(HostedBackend),
    /// Self-hosted v0.4.0 adapter, with the version the probe reported
    SelfHostedV040 {
        /// Version parsed from the health payload
        detected: Version,
        /// The bound adapter
        adapter: V040Backend,
    },
}

impl CogneeBackend {
    /// The backend family this handle dispatches to
    pub fn kind(&self) -> BackendKind {
        match self {
            Self::Hosted(_) => BackendKind::Hosted,
            Self::SelfHostedV040 { .. } => BackendKind::SelfHostedV040,
        }
    }

    /// The version the health probe reported, for self-hosted handles
    pub fn detected_version(&self) -> Option<&Version> {
        match self {
            Self::Hosted(_) => None,
            Self::SelfHostedV040 { detected, .. } => Some(detected),
        }
    }

    /// Ingest raw text for later processing
    pub async fn add(&self, args: &AddArgs) -> Result<Value> {
        match self {
            Self::Hosted(adapter) => adapter.add(args).await,
            Self::SelfHostedV040 { adapter, .. } => adapter.add(args).await,
        }
    }

    /// Process previously ingested text into queryable memory
    pub async fn cognify(&self, args: &CognifyArgs) -> Result<Value> {
        match self {
            Self::Hosted(adapter) => adapter.cognify(args).await,
            Self::SelfHostedV040 { adapter, .. } => adapter.cognify(args).await,
        }
    }

    /// Query processed memory with free text
    pub async fn search(&self, args: &SearchArgs) -> Result<Value> {
        match self {
            Self::Hosted(adapter) => adapter.search(args).await,
            Self::SelfHostedV040 { adapter, .. } => adapter.search(args).await,
        }
    }
}

/// The three uniform memory operations, for error mapping
#[derive(Debug, Clone, Copy)]
pub(crate) enum MemoryOp {
    Ingest,
    Process,
    Query,
}

impl MemoryOp {
    /// Wrap a backend-reported failure payload in the operation's error
    pub(crate) fn failure(self, payload: String) -> CogneeError {
        match self {
            Self::Ingest => CogneeError::Ingest { payload },
            Self::Process => CogneeError::Process { payload },
            Self::Query => CogneeError::Query { payload },
        }
    }
}

/// Build an HTTP client carrying the auth and extra headers for one adapter.
pub(crate) fn build_client(
    api_key: Option<&str>,
    extra_headers: &HashMap<String, String>,
) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();

    if let Some(key) = api_key {
        let value = HeaderValue::from_str(key)
            .map_err(|e| CogneeError::config(format!("invalid API key header value: {e}")))?;
        headers.insert("X-Api-Key", value);
    }

    for (name, value) in extra_headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| CogneeError::config(format!("invalid header name `{name}`: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| CogneeError::config(format!("invalid header value: {e}")))?;
        headers.insert(name, value);
    }

    Ok(reqwest::Client::builder()
        .default_headers(headers)
        .build()?)
}

/// Turn an HTTP response into an opaque receipt, or the operation's error
/// carrying the backend's raw payload.
pub(crate) async fn read_receipt(response: reqwest::Response, op: MemoryOp) -> Result<Value> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        let payload = if body.trim().is_empty() {
            format!("HTTP {status}")
        } else {
            body
        };
        return Err(op.failure(payload));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    // Some deployments answer with non-JSON bodies on success; keep them.
    Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
}
