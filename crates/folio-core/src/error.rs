use thiserror::Error;

use crate::model::RateLimitInfo;

#[derive(Debug, Error)]
pub enum FolioError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Upstream error: {0}")]
    Upstream(String),

    /// GitHub refused the call for quota reasons. Carries the `x-ratelimit-*`
    /// headers of the refused response when there were any.
    #[error("Rate limit exceeded: {message}")]
    RateLimited {
        message: String,
        rate_limit: Option<RateLimitInfo>,
    },

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl FolioError {
    pub fn rate_limited(message: impl Into<String>, rate_limit: Option<RateLimitInfo>) -> Self {
        Self::RateLimited {
            message: message.into(),
            rate_limit,
        }
    }

    /// Quota headers attached to the failure, if any.
    pub fn rate_limit_info(&self) -> Option<&RateLimitInfo> {
        match self {
            Self::RateLimited { rate_limit, .. } => rate_limit.as_ref(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, FolioError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limited_carries_headers() {
        let info = RateLimitInfo {
            limit: Some(60),
            remaining: Some(0),
            reset: Some(1_700_000_000),
            used: Some(60),
        };
        let err = FolioError::rate_limited("Rate limit exceeded.", Some(info.clone()));
        assert_eq!(err.rate_limit_info(), Some(&info));
        assert_eq!(err.to_string(), "Rate limit exceeded: Rate limit exceeded.");
    }

    #[test]
    fn test_other_errors_have_no_rate_limit() {
        assert!(FolioError::Upstream("GitHub API error: 500".into())
            .rate_limit_info()
            .is_none());
        assert!(FolioError::rate_limited("x", None).rate_limit_info().is_none());
    }

    #[test]
    fn test_llm_display_prefix() {
        let err = FolioError::Llm("Ollama request failed".into());
        assert_eq!(err.to_string(), "LLM error: Ollama request failed");
    }
}
