use thiserror::Error;

/// Classification of a failed fetch attempt.
///
/// Every kind carries its own retry policy: a rejected-as-invalid request
/// (HTTP 400) can never succeed on resubmission, so it terminates the
/// batch immediately instead of burning the remaining attempt budget.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited by server")]
    RateLimited,

    #[error("authentication rejected: {0}")]
    Auth(String),

    #[error("request rejected as invalid: {0}")]
    InvalidRequest(String),

    #[error("server error: HTTP {0}")]
    Server(u16),

    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::InvalidRequest(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_invalid_requests_are_terminal() {
        assert!(FetchError::RateLimited.is_retryable());
        assert!(FetchError::Auth("missing header".into()).is_retryable());
        assert!(FetchError::Server(503).is_retryable());
        assert!(!FetchError::InvalidRequest("batch size exceeded".into()).is_retryable());
    }
}
