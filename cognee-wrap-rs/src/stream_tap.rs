//! Streaming tap
//!
//! [`MemoryTap`] sits on a generation event stream, forwards every event
//! unchanged and in order, and accumulates text deltas on the side. When
//! the underlying stream ends cleanly, the accumulated exchange is handed
//! to a detached persistence task; the consumer never waits on it.

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::Stream;
use pin_project_lite::pin_project;
use tracing::debug;

use crate::backend::CogneeBackend;
use crate::errors::Result;
use crate::model::EventStream;
use crate::types::StreamEvent;
use crate::wrapper::store_exchange;

/// Everything the end-of-stream persistence task needs.
pub(crate) struct PersistJob {
    pub(crate) backend: Arc<CogneeBackend>,
    pub(crate) dataset: String,
    pub(crate) prompt_text: String,
}

pin_project! {
    /// Pass-through stream transform that persists the exchange once the
    /// underlying stream completes successfully.
    pub(crate) struct MemoryTap {
        #[pin]
        inner: EventStream,
        persist: Option<PersistJob>,
        accumulated: String,
        saw_error: bool,
        done: bool,
    }
}

impl MemoryTap {
    pub(crate) fn new(inner: EventStream, persist: Option<PersistJob>) -> Self {
        Self {
            inner,
            persist,
            accumulated: String::new(),
            saw_error: false,
            done: false,
        }
    }
}

impl Stream for MemoryTap {
    type Item = Result<StreamEvent>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.done {
            return Poll::Ready(None);
        }

        match this.inner.poll_next(cx) {
            Poll::Ready(Some(Ok(event))) => {
                match &event {
                    StreamEvent::TextDelta { delta } => this.accumulated.push_str(delta),
                    StreamEvent::Error { .. } => *this.saw_error = true,
                    StreamEvent::Finish { .. } => {}
                }
                Poll::Ready(Some(Ok(event)))
            }
            Poll::Ready(Some(Err(error))) => {
                *this.saw_error = true;
                Poll::Ready(Some(Err(error)))
            }
            Poll::Ready(None) => {
                *this.done = true;
                if !*this.saw_error && !this.accumulated.is_empty() {
                    if let Some(job) = this.persist.take() {
                        let assistant_text = std::mem::take(this.accumulated);
                        debug!("stream complete; scheduling interaction storage");
                        // Fire and forget: the consumer observes stream
                        // completion immediately, the write runs detached.
                        tokio::spawn(store_exchange(
                            job.backend,
                            job.dataset,
                            job.prompt_text,
                            assistant_text,
                        ));
                    }
                }
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
