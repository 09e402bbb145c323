//! The memory decorator
//!
//! [`CogneeModel`] wraps any [`LanguageModel`] and orchestrates the
//! generate/stream lifecycle around the backend's three memory operations:
//! optional retrieval before generation, prompt augmentation, delegation,
//! and persistence of the exchange afterwards. Memory failures never reach
//! the caller; the only error this layer adds to the primary path is a
//! configuration error raised during backend resolution.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::backend::{
    AddArgs, CogneeBackend, CognifyArgs, SearchArgs, SearchMode, extract_context, resolver,
};
use crate::errors::{CogneeError, Result};
use crate::model::{EventStream, LanguageModel};
use crate::stream_tap::{MemoryTap, PersistJob};
use crate::types::{CogneeOptions, ContentPart, GenerateRequest, GenerateResponse, PromptMessage};

/// How many search results retrieval asks for.
const RETRIEVAL_TOP_K: u32 = 5;

/// Cached resolution outcome. Failures are cached too, so one probe serves
/// the model's whole lifetime.
type ResolutionOutcome = std::result::Result<Arc<CogneeBackend>, Arc<CogneeError>>;

/// A language model decorated with cognee-backed long-term memory
pub struct CogneeModel {
    base: Arc<dyn LanguageModel>,
    options: CogneeOptions,
    backend: OnceCell<ResolutionOutcome>,
}

impl CogneeModel {
    /// Decorate a model with memory behavior described by `options`
    pub fn new(base: impl LanguageModel + 'static, options: CogneeOptions) -> Self {
        debug!(model_id = base.model_id(), "decorating model with cognee memory");
        Self {
            base: Arc::new(base),
            options,
            backend: OnceCell::new(),
        }
    }

    /// The effective configuration
    pub fn options(&self) -> &CogneeOptions {
        &self.options
    }

    /// The resolved backend handle, resolving on first use.
    ///
    /// Resolution runs exactly once per model instance and its outcome is
    /// cached either way: concurrent first callers await the same in-flight
    /// resolution, and after a failure later callers get the cached error
    /// replayed instead of a fresh probe.
    pub async fn backend(&self) -> Result<&Arc<CogneeBackend>> {
        let outcome = self
            .backend
            .get_or_init(|| async {
                match resolver::resolve(&self.options).await {
                    Ok(backend) => {
                        info!(backend = %backend.kind(), "cognee backend resolved");
                        Ok(Arc::new(backend))
                    }
                    Err(error) => {
                        warn!(%error, "cognee backend resolution failed");
                        Err(Arc::new(error))
                    }
                }
            })
            .await;

        match outcome {
            Ok(backend) => Ok(backend),
            Err(error) => Err(replay_resolution_failure(error.as_ref())),
        }
    }

    fn memory_enabled(&self) -> bool {
        self.options.store_interactions || self.options.retrieve_memory
    }

    /// Query prior context, degrading every failure to an empty blob.
    async fn retrieve_context(&self, backend: &CogneeBackend, query: &str) -> String {
        let args = SearchArgs {
            query: query.to_string(),
            search_type: Some(SearchMode::GraphCompletion),
            datasets: Some(vec![self.options.dataset_name.clone()]),
            top_k: Some(RETRIEVAL_TOP_K),
            ..Default::default()
        };

        match backend.search(&args).await {
            Ok(result) => {
                let context = extract_context(&result);
                if context.is_empty() {
                    debug!("no relevant context found");
                } else {
                    debug!(context_len = context.len(), "retrieved context");
                }
                context
            }
            Err(error) => {
                warn!(%error, "memory retrieval failed; continuing without context");
                String::new()
            }
        }
    }
}

#[async_trait]
impl LanguageModel for CogneeModel {
    fn provider(&self) -> &str {
        self.base.provider()
    }

    fn model_id(&self) -> &str {
        self.base.model_id()
    }

    fn supported_urls(&self) -> &[String] {
        self.base.supported_urls()
    }

    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse> {
        let backend = if self.memory_enabled() {
            Some(Arc::clone(self.backend().await?))
        } else {
            None
        };

        let prompt_text = extract_prompt_text(&request.prompt);
        let mut effective = request;

        if self.options.retrieve_memory {
            if let Some(backend) = &backend {
                let context = self.retrieve_context(backend, &prompt_text).await;
                if !context.is_empty() {
                    debug!("augmenting prompt with retrieved context");
                    effective.prompt = augment_prompt(effective.prompt, &context);
                }
            }
        }

        let response = self.base.generate(effective).await?;

        if self.options.store_interactions {
            if let Some(backend) = backend {
                let assistant_text = extract_content_text(&response.content);
                store_exchange(
                    backend,
                    self.options.dataset_name.clone(),
                    prompt_text,
                    assistant_text,
                )
                .await;
            }
        }

        Ok(response)
    }

    async fn stream(&self, request: GenerateRequest) -> Result<EventStream> {
        let backend = if self.memory_enabled() {
            Some(Arc::clone(self.backend().await?))
        } else {
            None
        };

        let prompt_text = extract_prompt_text(&request.prompt);
        let mut effective = request;

        if self.options.retrieve_memory {
            if let Some(backend) = &backend {
                let context = self.retrieve_context(backend, &prompt_text).await;
                if !context.is_empty() {
                    debug!("augmenting prompt with retrieved context");
                    effective.prompt = augment_prompt(effective.prompt, &context);
                }
            }
        }

        let inner = self.base.stream(effective).await?;

        let persist = match (self.options.store_interactions, backend) {
            (true, Some(backend)) => Some(PersistJob {
                backend,
                dataset: self.options.dataset_name.clone(),
                prompt_text,
            }),
            _ => None,
        };

        Ok(Box::pin(MemoryTap::new(inner, persist)))
    }
}

/// Persist one exchange: ingest both turns, then process the dataset.
///
/// Failures are logged and swallowed; persistence is best-effort by
/// contract and must never alter an already-produced generation result.
pub(crate) async fn store_exchange(
    backend: Arc<CogneeBackend>,
    dataset: String,
    user_text: String,
    assistant_text: String,
) {
    debug!(dataset = %dataset, "storing interaction");

    let add_args = AddArgs {
        payload: vec![
            format!("User: {user_text}"),
            format!("Assistant: {assistant_text}"),
        ],
        dataset_name: Some(dataset.clone()),
        ..Default::default()
    };

    if let Err(error) = backend.add(&add_args).await {
        warn!(%error, "failed to store interaction");
        return;
    }

    let cognify_args = CognifyArgs {
        datasets: Some(vec![dataset]),
        run_in_background: Some(false),
        ..Default::default()
    };

    if let Err(error) = backend.cognify(&cognify_args).await {
        warn!(%error, "failed to process stored interaction");
    }
}

/// Re-surface a cached resolution failure without re-probing.
///
/// Resolution errors are configuration-shaped by contract; anything else
/// that leaked out of a past attempt is replayed as one.
fn replay_resolution_failure(error: &CogneeError) -> CogneeError {
    match error {
        CogneeError::Config(message) => CogneeError::Config(message.clone()),
        CogneeError::BackendUndetermined(message) => {
            CogneeError::BackendUndetermined(message.clone())
        }
        other => CogneeError::config(format!("backend resolution failed: {other}")),
    }
}

/// Caller-turn text for queries and persistence: user and assistant
/// messages only, text parts joined by spaces, messages by newlines.
fn extract_prompt_text(prompt: &[PromptMessage]) -> String {
    prompt
        .iter()
        .filter_map(|message| match message {
            PromptMessage::User { content } | PromptMessage::Assistant { content } => {
                Some(extract_content_text(content))
            }
            PromptMessage::System { .. } => None,
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Text carried by a sequence of content parts.
fn extract_content_text(content: &[ContentPart]) -> String {
    content
        .iter()
        .map(|part| match part {
            ContentPart::Text { text } => text.as_str(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Prepend a system instruction carrying retrieved context.
fn augment_prompt(prompt: Vec<PromptMessage>, context: &str) -> Vec<PromptMessage> {
    let instruction = format!(
        "Relevant context from previous conversations:\n\n{context}\n\nUse this context to inform your response when relevant."
    );

    let mut augmented = Vec::with_capacity(prompt.len() + 1);
    augmented.push(PromptMessage::system(instruction));
    augmented.extend(prompt);
    augmented
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_prompt_text_skips_system() {
        let prompt = vec![
            PromptMessage::system("Be brief."),
            PromptMessage::user_text("Hi"),
            PromptMessage::assistant_text("Hello!"),
            PromptMessage::user_text("How are you?"),
        ];
        assert_eq!(extract_prompt_text(&prompt), "Hi\nHello!\nHow are you?");
    }

    #[test]
    fn test_extract_prompt_text_joins_parts_with_spaces() {
        let prompt = vec![PromptMessage::User {
            content: vec![ContentPart::text("part one"), ContentPart::text("part two")],
        }];
        assert_eq!(extract_prompt_text(&prompt), "part one part two");
    }

    #[test]
    fn test_augment_prompt_prepends_system_message() {
        let prompt = vec![PromptMessage::user_text("Hi")];
        let augmented = augment_prompt(prompt, "earlier facts");

        assert_eq!(augmented.len(), 2);
        match &augmented[0] {
            PromptMessage::System { content } => {
                assert!(content.contains("earlier facts"));
                assert!(content.starts_with("Relevant context from previous conversations:"));
            }
            other => panic!("expected system message, got {other:?}"),
        }
        assert_eq!(augmented[1], PromptMessage::user_text("Hi"));
    }

    #[test]
    fn test_replay_resolution_failure_preserves_kind() {
        let replayed = replay_resolution_failure(&CogneeError::config("missing API key"));
        assert!(matches!(replayed, CogneeError::Config(ref m) if m == "missing API key"));

        let replayed =
            replay_resolution_failure(&CogneeError::undetermined("health probe failed"));
        assert!(matches!(
            replayed,
            CogneeError::BackendUndetermined(ref m) if m == "health probe failed"
        ));

        // Anything else is still surfaced as a configuration failure.
        let replayed = replay_resolution_failure(&CogneeError::model("odd leak"));
        assert!(replayed.is_config_error());
        assert!(replayed.to_string().contains("odd leak"));
    }

    #[test]
    fn test_exchange_payload_shape() {
        let add_args = AddArgs {
            payload: vec![
                format!("User: {}", "Hi"),
                format!("Assistant: {}", "Hello!"),
            ],
            dataset_name: Some("conversations".to_string()),
            ..Default::default()
        };
        assert_eq!(add_args.payload, vec!["User: Hi", "Assistant: Hello!"]);
    }
}
