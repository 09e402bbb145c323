//! Adapter for the hosted cognee service
//!
//! All three operations are JSON bodies against `/api/*` paths, with the
//! API key carried in an `X-Api-Key` default header.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{AddArgs, CognifyArgs, MemoryOp, SearchArgs, SearchMode, build_client, read_receipt};
use crate::errors::Result;

/// HTTP adapter bound to the hosted backend's wire format
#[derive(Debug, Clone)]
pub struct HostedBackend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AddBody<'a> {
    text_data: &'a [String],
    dataset_name: Option<&'a str>,
    dataset_id: Option<&'a str>,
    node_set: Option<&'a [String]>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CognifyBody<'a> {
    datasets: Option<&'a [String]>,
    dataset_ids: Option<&'a [String]>,
    run_in_background: bool,
    custom_prompt: Option<&'a str>,
    temporal_cognify: Option<bool>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody<'a> {
    query: &'a str,
    search_type: SearchMode,
    datasets: Option<&'a [String]>,
    dataset_ids: Option<&'a [String]>,
    system_prompt: Option<&'a str>,
    node_name: Option<&'a [String]>,
    top_k: u32,
    only_context: bool,
    use_combined_context: bool,
}

impl HostedBackend {
    /// Create an adapter for the given endpoint and credential
    pub fn new(
        base_url: impl Into<String>,
        api_key: &str,
        extra_headers: &HashMap<String, String>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = build_client(Some(api_key), extra_headers)?;
        Ok(Self { client, base_url })
    }

    /// Ingest text payloads
    pub async fn add(&self, args: &AddArgs) -> Result<Value> {
        debug!(
            payload_len = args.payload.len(),
            dataset_name = ?args.dataset_name,
            "calling hosted add"
        );

        let body = AddBody {
            text_data: &args.payload,
            dataset_name: args.dataset_name.as_deref(),
            dataset_id: args.dataset_id.as_deref(),
            node_set: args.node_set.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/api/add", self.base_url))
            .json(&body)
            .send()
            .await?;

        read_receipt(response, MemoryOp::Ingest).await
    }

    /// Process ingested text into queryable memory
    pub async fn cognify(&self, args: &CognifyArgs) -> Result<Value> {
        debug!(datasets = ?args.datasets, "calling hosted cognify");

        let body = CognifyBody {
            datasets: args.datasets.as_deref(),
            dataset_ids: args.dataset_ids.as_deref(),
            run_in_background: args.run_in_background.unwrap_or(false),
            custom_prompt: args.custom_prompt.as_deref(),
            temporal_cognify: args.temporal_cognify,
        };

        let response = self
            .client
            .post(format!("{}/api/cognify", self.base_url))
            .json(&body)
            .send()
            .await?;

        read_receipt(response, MemoryOp::Process).await
    }

    /// Query processed memory
    pub async fn search(&self, args: &SearchArgs) -> Result<Value> {
        debug!(
            search_type = ?args.search_type.unwrap_or_default(),
            datasets = ?args.datasets,
            "calling hosted search"
        );

        let body = SearchBody {
            query: &args.query,
            search_type: args.search_type.unwrap_or_default(),
            datasets: args.datasets.as_deref(),
            dataset_ids: args.dataset_ids.as_deref(),
            system_prompt: args.system_prompt.as_deref(),
            node_name: args.node_name.as_deref(),
            top_k: args.top_k.unwrap_or(10),
            only_context: args.only_context.unwrap_or(false),
            use_combined_context: false,
        };

        let response = self
            .client
            .post(format!("{}/api/search", self.base_url))
            .json(&body)
            .send()
            .await?;

        read_receipt(response, MemoryOp::Query).await
    }
}
