use thiserror::Error;

pub type Result<T> = std::result::Result<T, TwitterError>;

#[derive(Debug, Error)]
pub enum TwitterError {
    #[error("request to Twitter failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Twitter returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Twitter rate limit hit (reset at {reset_at:?})")]
    RateLimited { reset_at: Option<u64> },
}

impl TwitterError {
    /// Transport failures, rate limits and server errors are worth retrying.
    /// Any other API status means the request itself was refused.
    pub fn is_retryable(&self) -> bool {
        match self {
            TwitterError::Http(_) => true,
            TwitterError::RateLimited { .. } => true,
            TwitterError::Api { status, .. } => *status >= 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_errors_are_retryable() {
        let err = TwitterError::Api {
            status: 503,
            message: "Service Unavailable".into(),
        };
        assert!(err.is_retryable());
    }

    #[test]
    fn client_errors_are_not_retryable() {
        let err = TwitterError::Api {
            status: 403,
            message: "duplicate content".into(),
        };
        assert!(!err.is_retryable());
    }

    #[test]
    fn rate_limit_is_retryable() {
        assert!(TwitterError::RateLimited { reset_at: Some(1) }.is_retryable());
    }
}
