use thiserror::Error;

#[derive(Debug, Error)]
pub enum LunchError {
    #[error("store unreachable ({backend}): {message}")]
    Transport { backend: String, message: String },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("timeout after {0}ms")]
    Timeout(u64),

    #[error("rate limited by {provider}")]
    RateLimited { provider: String },

    #[error("upstream error from {provider}: {message}")]
    Upstream {
        provider: String,
        message: String,
        status: Option<u16>,
    },

    #[error("auth failed for {provider}: {message}")]
    AuthFailed { provider: String, message: String },

    #[error("schema parse error: {0}")]
    SchemaParse(String),

    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl LunchError {
    /// Extract provider name from structured error variants.
    pub fn provider(&self) -> Option<&str> {
        match self {
            Self::Transport { backend, .. } => Some(backend),
            Self::RateLimited { provider } => Some(provider),
            Self::Upstream { provider, .. } => Some(provider),
            Self::AuthFailed { provider, .. } => Some(provider),
            _ => None,
        }
    }

    /// Produce a sanitized error message safe for returning to MCP clients.
    /// Does not leak sheet URLs, API keys, or upstream error bodies.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport { backend, .. } => {
                format!("could not reach the {backend} store")
            }
            Self::Validation(msg) => msg.clone(),
            Self::NotFound(what) => format!("not found: {what}"),
            Self::Timeout(ms) => format!("request timed out after {ms}ms"),
            Self::RateLimited { provider } => {
                format!("rate limited by {provider}, try again shortly")
            }
            Self::Upstream {
                provider, status, ..
            } => match status {
                Some(code) => format!("upstream error from {provider} (HTTP {code})"),
                None => format!("upstream error from {provider}"),
            },
            Self::AuthFailed { provider, .. } => {
                format!("authentication failed for {provider}")
            }
            Self::SchemaParse(_) => "failed to parse upstream response".to_string(),
            Self::Request(_) => "request to upstream failed".to_string(),
            Self::Io(_) => "local storage error".to_string(),
            Self::Other(msg) => msg.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_hides_upstream_body() {
        let e = LunchError::Upstream {
            provider: "openai".to_string(),
            message: "500: secret stack trace https://internal".to_string(),
            status: Some(500),
        };
        let msg = e.user_message();
        assert!(!msg.contains("secret"));
        assert!(msg.contains("500"));
        assert_eq!(e.provider(), Some("openai"));
    }

    #[test]
    fn validation_message_passes_through() {
        let e = LunchError::Validation("name is required".to_string());
        assert_eq!(e.user_message(), "name is required");
        assert!(e.provider().is_none());
    }
}
