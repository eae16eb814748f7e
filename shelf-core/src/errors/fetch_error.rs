/// Failures of the external review/activity collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("{operation} failed: {reason}")]
    Store { operation: String, reason: String },

    #[error("{operation} timed out after {timeout_ms}ms")]
    Timeout { operation: String, timeout_ms: u64 },

    #[error("{operation} cancelled")]
    Cancelled { operation: String },
}

impl FetchError {
    /// Whether the request was cancelled by its caller.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
