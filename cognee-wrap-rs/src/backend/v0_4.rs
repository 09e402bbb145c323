//! Adapter for self-hosted cognee v0.4.0 deployments
//!
//! The v0.4.0 API lives under `/api/v1/*`. Its `add` endpoint expects
//! multipart form data with one `data` part per text payload; `cognify`
//! predates the temporal flag. The credential header is optional for
//! self-hosted deployments.

use std::collections::HashMap;

use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{AddArgs, CognifyArgs, MemoryOp, SearchArgs, SearchMode, build_client, read_receipt};
use crate::errors::Result;

/// HTTP adapter bound to the v0.4.0 self-hosted wire format
#[derive(Debug, Clone)]
pub struct V040Backend {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CognifyBody<'a> {
    datasets: Option<&'a [String]>,
    dataset_ids: Option<&'a [String]>,
    run_in_background: bool,
    custom_prompt: Option<&'a str>,
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

impl V040Backend {
    /// Create an adapter for the given endpoint and optional credential
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<&str>,
        extra_headers: &HashMap<String, String>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let client = build_client(api_key, extra_headers)?;
        Ok(Self { client, base_url })
    }

    /// Ingest text payloads as multipart form data
    pub async fn add(&self, args: &AddArgs) -> Result<Value> {
        debug!(
            payload_len = args.payload.len(),
            dataset_name = ?args.dataset_name,
            "calling v0.4.0 add"
        );

        let mut form = Form::new();
        for (index, text) in args.payload.iter().enumerate() {
            let part = Part::text(text.clone())
                .file_name(format!("text_{index}.txt"))
                .mime_str("text/plain")?;
            form = form.part("data", part);
        }
        if let Some(name) = &args.dataset_name {
            form = form.text("datasetName", name.clone());
        }
        if let Some(id) = &args.dataset_id {
            form = form.text("datasetId", id.clone());
        }
        if let Some(nodes) = &args.node_set {
            for node in nodes {
                form = form.text("node_set", node.clone());
            }
        }

        let response = self
            .client
            .post(format!("{}/api/v1/add", self.base_url))
            .multipart(form)
            .send()
            .await?;

        read_receipt(response, MemoryOp::Ingest).await
    }

    /// Process ingested text into queryable memory
    pub async fn cognify(&self, args: &CognifyArgs) -> Result<Value> {
        debug!(datasets = ?args.datasets, "calling v0.4.0 cognify");

        let body = CognifyBody {
            datasets: args.datasets.as_deref(),
            dataset_ids: args.dataset_ids.as_deref(),
            run_in_background: args.run_in_background.unwrap_or(false),
            custom_prompt: args.custom_prompt.as_deref(),
        };

        let response = self
            .client
            .post(format!("{}/api/v1/cognify", self.base_url))
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
            "calling v0.4.0 search"
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
            .post(format!("{}/api/v1/search", self.base_url))
            .json(&body)
            .send()
            .await?;

        read_receipt(response, MemoryOp::Query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cognify_body_has_no_temporal_field() {
        let body = CognifyBody {
            datasets: None,
            dataset_ids: None,
            run_in_background: false,
            custom_prompt: None,
        };
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("temporalCognify").is_none());
        assert_eq!(value["runInBackground"], json!(false));
    }

    #[test]
    fn test_new_without_api_key() {
        let backend = V040Backend::new("http://localhost:8000/", None, &HashMap::new()).unwrap();
        assert_eq!(backend.base_url, "http://localhost:8000");
    }
}
