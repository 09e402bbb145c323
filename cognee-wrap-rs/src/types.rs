//! Core types for the cognee wrapper
//!
//! This module defines the wrapper configuration and the prompt, response,
//! and stream-event types exchanged with the wrapped language model.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Dataset used when the integrator does not configure one.
pub const DEFAULT_DATASET: &str = "conversations";

/// Configuration for a memory-decorated model.
///
/// Created once at decoration time and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct CogneeOptions {
    /// API key for the cognee backend. Required for the hosted service,
    /// optional for self-hosted deployments.
    pub api_key: Option<String>,

    /// Backend endpoint. When absent, the hosted service is assumed.
    pub base_url: Option<String>,

    /// Extra headers sent with every backend request.
    pub headers: HashMap<String, String>,

    /// Dataset (memory store) interactions are written to and queried from.
    pub dataset_name: String,

    /// Whether each exchange is persisted after generation. Default `true`.
    pub store_interactions: bool,

    /// Whether prior context is queried before generation. Default `false`.
    pub retrieve_memory: bool,
}

impl Default for CogneeOptions {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            headers: HashMap::new(),
            dataset_name: DEFAULT_DATASET.to_string(),
            store_interactions: true,
            retrieve_memory: false,
        }
    }
}

impl CogneeOptions {
    /// Create a builder for fluent construction
    pub fn builder() -> CogneeOptionsBuilder {
        CogneeOptionsBuilder::default()
    }
}

/// Builder for CogneeOptions
#[derive(Debug, Default)]
pub struct CogneeOptionsBuilder {
    options: CogneeOptions,
}

impl CogneeOptionsBuilder {
    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.options.api_key = Some(key.into());
        self
    }

    /// Set the backend endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.options.base_url = Some(url.into());
        self
    }

    /// Add a single extra transport header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.headers.insert(name.into(), value.into());
        self
    }

    /// Replace all extra transport headers
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.options.headers = headers;
        self
    }

    /// Set the dataset name
    pub fn dataset_name(mut self, name: impl Into<String>) -> Self {
        self.options.dataset_name = name.into();
        self
    }

    /// Enable or disable interaction persistence
    pub fn store_interactions(mut self, enabled: bool) -> Self {
        self.options.store_interactions = enabled;
        self
    }

    /// Enable or disable pre-generation memory retrieval
    pub fn retrieve_memory(mut self, enabled: bool) -> Self {
        self.options.retrieve_memory = enabled;
        self
    }

    /// Build the options
    pub fn build(self) -> CogneeOptions {
        self.options
    }
}

/// A single message in a prompt, tagged by role
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum PromptMessage {
    /// System-level instruction
    System {
        /// Instruction text
        content: String,
    },
    /// Caller turn
    User {
        /// Message content parts
        content: Vec<ContentPart>,
    },
    /// Generated turn
    Assistant {
        /// Message content parts
        content: Vec<ContentPart>,
    },
}

impl PromptMessage {
    /// Create a system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::System {
            content: content.into(),
        }
    }

    /// Create a user message with a single text part
    pub fn user_text(text: impl Into<String>) -> Self {
        Self::User {
            content: vec![ContentPart::text(text)],
        }
    }

    /// Create an assistant message with a single text part
    pub fn assistant_text(text: impl Into<String>) -> Self {
        Self::Assistant {
            content: vec![ContentPart::text(text)],
        }
    }
}

/// A piece of message or response content, tagged by type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    /// Plain text content
    Text {
        /// The text
        text: String,
    },
}

impl ContentPart {
    /// Create a text part
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }
}

/// A request to the wrapped language model
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    /// Ordered prompt messages
    pub prompt: Vec<PromptMessage>,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Maximum number of output tokens
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
}

impl GenerateRequest {
    /// Create a request from a single user text turn
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            prompt: vec![PromptMessage::user_text(text)],
            ..Default::default()
        }
    }
}

/// Why the model stopped generating
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    /// Natural stop
    #[default]
    Stop,
    /// Output-token limit reached
    Length,
    /// Content was filtered
    ContentFilter,
    /// The model requested tool calls
    ToolCalls,
    /// Generation failed
    Error,
    /// Provider-specific reason
    Other,
}

/// Token accounting for one generation
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Usage {
    /// Tokens consumed by the prompt
    pub input_tokens: u32,
    /// Tokens produced by the model
    pub output_tokens: u32,
}

/// A single-shot result from the wrapped language model
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct GenerateResponse {
    /// Generated content parts
    pub content: Vec<ContentPart>,
    /// Why generation stopped
    pub finish_reason: FinishReason,
    /// Token accounting
    pub usage: Usage,
    /// Non-fatal warnings reported by the provider
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl GenerateResponse {
    /// Create a response with a single text part
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentPart::text(text)],
            ..Default::default()
        }
    }
}

/// An event emitted by a streaming generation
///
/// A well-formed stream ends with exactly one terminal item: an
/// `Ok(Finish)`, an `Ok(Error)`, or an `Err(_)`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// An incremental text fragment
    TextDelta {
        /// The appended fragment
        delta: String,
    },
    /// Successful completion
    Finish {
        /// Why generation stopped
        finish_reason: FinishReason,
        /// Token accounting
        usage: Usage,
    },
    /// Terminal provider-reported error
    Error {
        /// Error description
        message: String,
    },
}
