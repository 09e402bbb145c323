//! Language-model abstraction
//!
//! This module defines the [`LanguageModel`] trait, the seam between the
//! memory decorator and whatever generation capability it wraps. Provider
//! integrations implement it; [`crate::CogneeModel`] implements it too, so
//! decorated models compose anywhere an undecorated one is accepted.

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::errors::Result;
use crate::types::{GenerateRequest, GenerateResponse, StreamEvent};

/// A pinned, boxed stream of generation events
pub type EventStream = Pin<Box<dyn Stream<Item = Result<StreamEvent>> + Send>>;

/// A generation capability that can be decorated with memory
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider identifier (for example `"openai"`)
    fn provider(&self) -> &str;

    /// Model identifier (for example `"gpt-4"`)
    fn model_id(&self) -> &str;

    /// URL patterns the model can fetch natively
    ///
    /// Passed through unmodified by decorators. Defaults to none.
    fn supported_urls(&self) -> &[String] {
        &[]
    }

    /// Run a single-shot generation
    async fn generate(&self, request: GenerateRequest) -> Result<GenerateResponse>;

    /// Run a streaming generation
    ///
    /// The returned stream must end with exactly one terminal item
    /// (`Finish`, `Error`, or an `Err`).
    async fn stream(&self, request: GenerateRequest) -> Result<EventStream>;
}
