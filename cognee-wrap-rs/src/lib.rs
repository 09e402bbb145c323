//! # cognee-wrap
//!
//! Long-term memory for language models, backed by a remote
//! [cognee](https://www.cognee.ai) knowledge-graph service.
//!
//! The crate is a decorator, not a model or a memory engine: wrap any
//! [`LanguageModel`] in a [`CogneeModel`] and it will, depending on its
//! configuration, query prior context before generating, inject it into the
//! prompt, and persist each exchange afterwards for future retrieval.
//! Memory failures are logged and swallowed; the wrapped model's result is
//! never blocked or altered by the memory subsystem.
//!
//! ## Features
//!
//! - **Transparent decoration**: `CogneeModel` implements `LanguageModel`,
//!   so decorated and undecorated models are interchangeable
//! - **Backend auto-detection**: hosted service and versioned self-hosted
//!   deployments are resolved at runtime from a health probe
//! - **Streaming support**: events pass through untouched; the exchange is
//!   persisted by a detached task once the stream completes
//! - **Best-effort memory**: only a misconfigured backend can fail a call;
//!   every per-operation failure degrades to a no-op
//!
//! ## Quick Start
//!
//! ```rust
//! use cognee_wrap::CogneeOptions;
//!
//! let options = CogneeOptions::builder()
//!     .api_key("your-cognee-api-key")
//!     .retrieve_memory(true)
//!     .build();
//! ```
//!
//! then decorate a model with [`wrap_with_cognee`] (or
//! [`CogneeModel::new`]) and call `generate`/`stream` on the result as you
//! would on the model itself.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

/// Backend resolution and the adapter variant set
pub mod backend;
mod errors;
mod model;
mod stream_tap;
mod types;
mod wrapper;

pub use errors::{CogneeError, Result};
pub use model::{EventStream, LanguageModel};
pub use types::{
    CogneeOptions, CogneeOptionsBuilder, ContentPart, DEFAULT_DATASET, FinishReason,
    GenerateRequest, GenerateResponse, PromptMessage, StreamEvent, Usage,
};
pub use wrapper::CogneeModel;

/// Wrap a language model with cognee memory and context enhancement
///
/// Convenience constructor for [`CogneeModel::new`].
pub fn wrap_with_cognee(
    model: impl LanguageModel + 'static,
    options: CogneeOptions,
) -> CogneeModel {
    CogneeModel::new(model, options)
}

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        CogneeError, CogneeModel, CogneeOptions, GenerateRequest, GenerateResponse, LanguageModel,
        PromptMessage, Result, StreamEvent, wrap_with_cognee,
    };
}
