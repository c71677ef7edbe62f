use socksgate_domain::DomainError;
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Per-request execution context handed in by the protocol engine.
///
/// Cloning shares the same cancellation; [`RequestContext::child`] derives a
/// context that is cancelled with its parent but can also be cancelled alone.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancellation: CancellationToken,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cancellation(cancellation: CancellationToken) -> Self {
        Self { cancellation }
    }

    pub fn child(&self) -> Self {
        Self {
            cancellation: self.cancellation.child_token(),
        }
    }

    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancellation.is_cancelled()
    }

    /// Drive `work` to completion unless the context is cancelled first.
    ///
    /// On cancellation `work` is dropped, which aborts any I/O it was awaiting.
    pub async fn run<F, T>(&self, work: F) -> Result<T, DomainError>
    where
        F: Future<Output = Result<T, DomainError>>,
    {
        if self.is_cancelled() {
            return Err(DomainError::Cancelled);
        }

        tokio::select! {
            biased;
            _ = self.cancellation.cancelled() => Err(DomainError::Cancelled),
            result = work => result,
        }
    }
}
