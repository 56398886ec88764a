use std::fmt;

mod client;
mod wire;

pub use client::ChatCompletionClient;

/// Multimodal query provider interface
#[async_trait::async_trait]
pub trait VisionQuery: Send + Sync {
    /// Ask the model about a base64-encoded PNG
    ///
    /// A non-success HTTP status is a [`QueryResult::Rejected`], not an error.
    async fn query(&self, image_b64: &str) -> Result<QueryResult, VisionError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

/// What the endpoint answered
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryResult {
    /// First choice's message content, unmodified
    Answer(String),
    /// Non-success status with the server's message when it sent one
    Rejected { status: u16, message: Option<String> },
}

impl QueryResult {
    pub fn is_answer(&self) -> bool {
        matches!(self, QueryResult::Answer(_))
    }

    /// Text shown on the console and written to the log
    pub fn text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryResult::Answer(text) => f.write_str(text),
            QueryResult::Rejected { status, message } => write!(
                f,
                "Request failed (HTTP {status}): {}",
                message.as_deref().unwrap_or("unknown error")
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub model: String,
    pub endpoint: String,
}

#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_text_is_untouched() {
        let result = QueryResult::Answer("  原文\n翻訳  ".to_string());
        assert_eq!(result.text(), "  原文\n翻訳  ");
        assert!(result.is_answer());
    }

    #[test]
    fn rejection_embeds_server_message() {
        let result = QueryResult::Rejected {
            status: 429,
            message: Some("rate limited".to_string()),
        };
        assert_eq!(result.text(), "Request failed (HTTP 429): rate limited");
        assert!(!result.is_answer());
    }

    #[test]
    fn rejection_without_message_uses_marker() {
        let result = QueryResult::Rejected {
            status: 502,
            message: None,
        };
        assert_eq!(result.text(), "Request failed (HTTP 502): unknown error");
    }
}
