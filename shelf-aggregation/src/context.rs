//! Per-request context: request id, cancellation, and fetch timeouts.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use uuid::Uuid;

use shelf_core::errors::{FetchError, ShelfError, ShelfResult};

/// Cloneable cancellation signal shared by everything serving one request.
#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`cancel`](Self::cancel) has been called.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        if rx.wait_for(|cancelled| *cancelled).await.is_err() {
            // The sender lives as long as `self`, so this never resolves.
            std::future::pending::<()>().await;
        }
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything one request carries through the pipeline.
#[derive(Debug, Clone)]
pub struct RequestContext {
    request_id: Uuid,
    cancel: CancelToken,
    fetch_timeout: Option<Duration>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            cancel: CancelToken::new(),
            fetch_timeout: None,
        }
    }

    /// Bound every guarded call by `timeout`. `None` disables the bound.
    pub fn with_fetch_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// Share an existing token, e.g. one held by the caller's connection handler.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }

    pub fn cancel_token(&self) -> &CancelToken {
        &self.cancel
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        self.fetch_timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Fail with `Cancelled` if the request was cancelled.
    pub fn check_cancelled(&self, operation: &str) -> ShelfResult<()> {
        if self.is_cancelled() {
            return Err(cancelled(operation));
        }
        Ok(())
    }

    /// Run one collaborator call under this request's cancellation and timeout.
    ///
    /// Cancellation drops `call` and returns `FetchError::Cancelled`. A timeout
    /// returns `FetchError::Timeout`. Any other error the collaborator returns
    /// is reported as `FetchError::Store` unless it already is a fetch error.
    pub async fn guard<F, T>(&self, operation: &str, call: F) -> ShelfResult<T>
    where
        F: Future<Output = ShelfResult<T>>,
    {
        self.check_cancelled(operation)?;

        let bounded = async {
            match self.fetch_timeout {
                Some(limit) => match tokio::time::timeout(limit, call).await {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout {
                        operation: operation.to_string(),
                        timeout_ms: u64::try_from(limit.as_millis()).unwrap_or(u64::MAX),
                    }
                    .into()),
                },
                None => call.await,
            }
        };

        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(cancelled(operation)),
            result = bounded => result,
        };

        result.map_err(|e| match e {
            ShelfError::FetchError(_) => e,
            other => FetchError::Store {
                operation: operation.to_string(),
                reason: other.to_string(),
            }
            .into(),
        })
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}

fn cancelled(operation: &str) -> ShelfError {
    FetchError::Cancelled {
        operation: operation.to_string(),
    }
    .into()
}
