// Page-local request state: idle -> loading -> settled(Ok | Err).
// Rendering reads the current state only; transitions happen on await boundaries.

use std::future::Future;

use crate::error::ClientError;
use crate::flows::Flow;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum PageState<T> {
    #[default]
    Idle,
    Loading,
    Settled(Result<T, String>),
}

impl<T> PageState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, PageState::Loading)
    }

    // Starting a new request discards any previous outcome
    pub fn begin(&mut self) {
        *self = PageState::Loading;
    }

    pub fn settle(&mut self, outcome: Result<T, String>) {
        *self = PageState::Settled(outcome);
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            PageState::Settled(Ok(v)) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            PageState::Settled(Err(e)) => Some(e.as_str()),
            _ => None,
        }
    }

    // Only a settled success counts; idle or loading pages have nothing to show
    pub fn succeeded(&self) -> bool {
        matches!(self, PageState::Settled(Ok(_)))
    }

    /// Runs one request through the full cycle, translating failures into the
    /// flow's user-visible message.
    pub async fn run<F>(&mut self, flow: Flow, request: F) -> &Self
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        self.begin();
        let outcome = request.await.map_err(|e| {
            tracing::debug!(?flow, error = %e, "Request settled with an error");
            flow.failure_message(&e)
        });
        self.settle(outcome);
        self
    }
}
