//! Crate-wide error taxonomy.
//!
//! DESIGN
//! ======
//! One enum covers every failure class the core distinguishes, because the
//! query cache and the guard layer both dispatch on it: transient network
//! failures are retried, authorization denials are routed to the sign-in
//! redirect, validation failures never reach the network at all. The enum
//! is `Clone` so a single failed fetch can be reported to every reader
//! sharing the in-flight request.

/// Error classes surfaced by the auth gateway, the backend client, and the
/// query cache.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The identity provider rejected an operation. Shown inline.
    #[error("auth provider rejected the request: {0}")]
    Auth(String),
    /// The backend denied the request as unauthorized. Never retried;
    /// the guard layer redirects to sign-in instead.
    #[error("authorization denied")]
    Unauthorized,
    /// Transient transport failure. Safe to retry.
    #[error("network error: {0}")]
    Network(String),
    /// A client-side invariant was violated before submission.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The referenced entity does not exist. Rendered as an empty state,
    /// not an error banner.
    #[error("not found")]
    NotFound,
}

impl ApiError {
    /// Whether the retry policy may re-issue the failed request.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
