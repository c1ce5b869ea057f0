use offcache_core::Error;

/// Transport-level failures.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    #[error("invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("request timed out")]
    Timeout,

    #[error("response too large: {len} bytes exceeds {max}")]
    TooLarge { len: usize, max: usize },

    #[error("network error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { FetchError::Timeout } else { FetchError::Transport(err.to_string()) }
    }
}

impl From<FetchError> for Error {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::InvalidMethod(_) => Error::InvalidInput(err.to_string()),
            other => Error::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_core_error() {
        let err: Error = FetchError::Timeout.into();
        assert!(matches!(err, Error::Network(msg) if msg == "request timed out"));

        let err: Error = FetchError::TooLarge { len: 10, max: 5 }.into();
        assert_eq!(err.to_string(), "NETWORK_ERROR: response too large: 10 bytes exceeds 5");

        let err: Error = FetchError::InvalidMethod("X Y".into()).into();
        assert!(matches!(err, Error::InvalidInput(_)));
    }
}
