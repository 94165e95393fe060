use thiserror::Error;

/// Failures produced by a single BIN lookup.
///
/// None of these are retried by the client; the caller decides.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("{status_code}: Rate limit exceeded. Please try again later.")]
    RateLimitExceeded { status_code: u16 },

    #[error("Error fetching data for BIN {bin}: {status_code}")]
    LookupFailed { bin: String, status_code: u16 },

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid proxy URL {proxy}: {source}")]
    InvalidProxy {
        proxy: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Invalid base URL: {url}")]
    InvalidBaseUrl { url: String },
}

impl LookupError {
    /// HTTP status carried by the status-derived kinds
    pub fn status_code(&self) -> Option<u16> {
        match self {
            LookupError::RateLimitExceeded { status_code } => Some(*status_code),
            LookupError::LookupFailed { status_code, .. } => Some(*status_code),
            LookupError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, LookupError::RateLimitExceeded { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_message() {
        let err = LookupError::RateLimitExceeded { status_code: 429 };
        assert_eq!(
            err.to_string(),
            "429: Rate limit exceeded. Please try again later."
        );
        assert!(err.is_rate_limited());
        assert_eq!(err.status_code(), Some(429));
    }

    #[test]
    fn test_lookup_failed_message() {
        let err = LookupError::LookupFailed {
            bin: "45717360".to_string(),
            status_code: 404,
        };
        assert_eq!(err.to_string(), "Error fetching data for BIN 45717360: 404");
        assert!(!err.is_rate_limited());
        assert_eq!(err.status_code(), Some(404));
    }

    #[test]
    fn test_base_url_error_has_no_status() {
        let err = LookupError::InvalidBaseUrl {
            url: "mailto:nobody".to_string(),
        };
        assert_eq!(err.status_code(), None);
    }
}
