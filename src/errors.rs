//! Error types for llmi18n
//!
//! Every failure is terminal for the call in progress. Nothing here is
//! retried; callers that need resilience wrap the client themselves.

use thiserror::Error;

/// Main error type for the generation client and the translator
#[derive(Error, Debug)]
pub enum LlmError {
    /// Request payload could not be encoded
    #[error("Failed to serialize request: {0}")]
    Serialization(#[source] serde_json::Error),

    /// Network call could not be established or failed mid-flight
    #[error("Connection to inference server failed: {0}")]
    Connection(#[from] reqwest::Error),

    /// Server answered with a non-success status code
    #[error("Ollama returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Server sent an `{"error": ...}` record inside a successful response
    #[error("Ollama reported an error: {0}")]
    Server(String),

    /// No progress from the server within the idle deadline
    #[error("No response from server for {duration_ms}ms")]
    Timeout { duration_ms: u64 },

    /// A record of the response body is malformed
    #[error("Failed to decode response chunk: {0}")]
    Decode(String),

    /// Response body ended before a chunk reported `done`
    #[error("Response stream ended before a done chunk ({pending_bytes} bytes left undecoded)")]
    UnexpectedEof { pending_bytes: usize },

    /// Sentinel for handlers that want to stop a stream early
    #[error("Generation aborted by handler: {0}")]
    Aborted(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, LlmError>;

impl LlmError {
    /// Whether the failure came from decoding the response body
    pub fn is_decode(&self) -> bool {
        matches!(self, LlmError::Decode(_) | LlmError::UnexpectedEof { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_error_display() {
        let err = LlmError::Status {
            status: 404,
            body: r#"{"error":"model 'mistral' not found"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("404"));
        assert!(msg.contains(r#"{"error":"model 'mistral' not found"}"#));
    }

    #[test]
    fn test_eof_is_decode() {
        let err = LlmError::UnexpectedEof { pending_bytes: 0 };
        assert!(err.is_decode());
        assert!(err.to_string().contains("done chunk"));

        assert!(LlmError::Decode("bad".to_string()).is_decode());
        assert!(!LlmError::Aborted("stop".to_string()).is_decode());
    }

    #[test]
    fn test_server_and_timeout_display() {
        let err = LlmError::Server("model ran out of memory".to_string());
        assert_eq!(err.to_string(), "Ollama reported an error: model ran out of memory");
        assert!(!err.is_decode());

        let err = LlmError::Timeout { duration_ms: 250 };
        assert!(err.to_string().contains("250ms"));
        assert!(!err.is_decode());
    }
}
