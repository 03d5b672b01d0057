/// Embedding provider failures.
///
/// `ProviderUnavailable` and `Timeout` are transient and retried with
/// backoff up to the configured attempt cap; the rest surface immediately.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EmbeddingError {
    #[error("provider {provider} unavailable: {reason}")]
    ProviderUnavailable { provider: String, reason: String },

    #[error("provider {provider} timed out after {timeout_ms}ms")]
    Timeout { provider: String, timeout_ms: u64 },

    #[error("expected {expected} dimensions, provider returned {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("retries exhausted after {attempts} attempt(s): {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },

    #[error("provider {provider} returned a malformed response: {details}")]
    MalformedResponse { provider: String, details: String },
}

impl EmbeddingError {
    /// Whether a retry with backoff is worthwhile.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EmbeddingError::ProviderUnavailable { .. } | EmbeddingError::Timeout { .. }
        )
    }
}
