//! Ollama API streaming client
//!
//! Provides one request/response cycle against the generate endpoint:
//! - HTTP/1.1 streaming via reqwest
//! - Endpoint: POST {base_url}{generate_path}
//! - Body: sequence of JSON records, terminated by one with `done = true`

use crate::errors::{LlmError, Result};
use crate::streaming::parser::{ChunkDecoder, MAX_BUFFER_SIZE, MAX_UNSTREAMED_BUFFER_SIZE};
use crate::types::{GenerationChunk, GenerationRequest};
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, Stream, StreamExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// Default generate endpoint path
pub const DEFAULT_GENERATE_PATH: &str = "/api/generate";

/// Default idle timeout (5 minutes, a first token on CPU is slow)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(300);

/// Connection settings injected at construction
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub generate_path: String,
    /// Idle deadline: the longest wait for the connection, the response
    /// headers, or the next body read. A long generation that keeps
    /// sending is never cut off. With `stream = false` the server sends
    /// nothing until the text is complete, so there it bounds the whole
    /// generation. `None` waits on a stalled server indefinitely.
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OLLAMA_URL.to_string(),
            generate_path: DEFAULT_GENERATE_PATH.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    /// Default settings against another server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }
}

/// Ollama streaming client
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    config: ClientConfig,
}

impl OllamaClient {
    /// Create new Ollama client with default settings
    pub fn new() -> Result<Self> {
        Self::with_config(ClientConfig::default())
    }

    /// Create Ollama client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self { client, config })
    }

    /// Send a generation request and return its chunks as a lazy stream
    ///
    /// The stream ends right after the chunk with `done = true`; nothing
    /// past it is read. If the body ends first, the last item is
    /// [`LlmError::UnexpectedEof`]. Any error is the last item.
    ///
    /// With `stream = false` the single record may hold the whole text, so
    /// the decoder accepts up to [`MAX_UNSTREAMED_BUFFER_SIZE`] instead of
    /// [`MAX_BUFFER_SIZE`].
    pub async fn generate_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<impl Stream<Item = Result<GenerationChunk>>> {
        let url = self.generate_url();
        let payload = serde_json::to_vec(request).map_err(LlmError::Serialization)?;

        debug!(
            url = %url,
            model = request.model(),
            stream = request.stream(),
            prompt_bytes = request.prompt().len(),
            "sending generate request"
        );

        let send = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send();
        let response = within(self.config.timeout, send).await??;

        let status = response.status();
        if !status.is_success() {
            // Error bodies are not chunked, read them whole
            let body = within(self.config.timeout, response.text()).await??;
            warn!(status = status.as_u16(), "generate request rejected");
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let max_buffer_size = if request.stream() {
            MAX_BUFFER_SIZE
        } else {
            MAX_UNSTREAMED_BUFFER_SIZE
        };
        let reader = ChunkReader {
            body: response.bytes_stream().boxed(),
            decoder: ChunkDecoder::with_capacity(max_buffer_size),
            idle_timeout: self.config.timeout,
            finished: false,
        };

        Ok(stream::unfold(reader, |mut reader| async move {
            if reader.finished {
                return None;
            }
            let item = reader.next_chunk().await;
            reader.finished = match &item {
                Ok(chunk) => chunk.done,
                Err(_) => true,
            };
            Some((item, reader))
        }))
    }

    /// Send a generation request and hand every chunk to `handler`
    ///
    /// The handler runs in the decode loop, in arrival order. Its first
    /// error aborts the call and is returned unchanged; the rest of the body
    /// is dropped unread.
    pub async fn generate<F>(&self, request: &GenerationRequest, mut handler: F) -> Result<()>
    where
        F: FnMut(GenerationChunk) -> Result<()>,
    {
        let chunks = self.generate_stream(request).await?;
        futures_util::pin_mut!(chunks);

        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            let done = chunk.done;
            handler(chunk)?;
            if done {
                return Ok(());
            }
        }

        // The stream only ends early through an error item
        Err(LlmError::UnexpectedEof { pending_bytes: 0 })
    }

    /// Check if Ollama is available
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/version", self.base_url());

        let sent = within(self.config.timeout, self.client.get(&url).send()).await;
        match sent.and_then(|response| response.map_err(LlmError::from)) {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                debug!(error = %e, "health check failed");
                Ok(false)
            }
        }
    }

    /// List installed models
    pub async fn list_models(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/tags", self.base_url());

        let response = within(self.config.timeout, self.client.get(&url).send()).await??;

        let status = response.status();
        if !status.is_success() {
            let body = within(self.config.timeout, response.text()).await??;
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let models = within(self.config.timeout, response.json::<ModelsResponse>()).await??;
        Ok(models.models.into_iter().map(|m| m.name).collect())
    }

    /// Full URL of the generate endpoint
    pub fn generate_url(&self) -> String {
        format!("{}{}", self.base_url(), self.config.generate_path)
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

/// Run `fut` under the idle deadline, if there is one
async fn within<F: Future>(deadline: Option<Duration>, fut: F) -> Result<F::Output> {
    match deadline {
        Some(duration) => tokio::time::timeout(duration, fut)
            .await
            .map_err(|_| LlmError::Timeout {
                duration_ms: duration.as_millis() as u64,
            }),
        None => Ok(fut.await),
    }
}

/// Pull side of the chunk stream: response body plus decoder
struct ChunkReader {
    body: BoxStream<'static, reqwest::Result<Bytes>>,
    decoder: ChunkDecoder,
    idle_timeout: Option<Duration>,
    finished: bool,
}

impl ChunkReader {
    async fn next_chunk(&mut self) -> Result<GenerationChunk> {
        loop {
            if let Some(chunk) = self.decoder.decode_next()? {
                trace!(
                    done = chunk.done,
                    bytes = chunk.response_text.len(),
                    "decoded chunk"
                );
                return Ok(chunk);
            }

            match within(self.idle_timeout, self.body.next()).await? {
                Some(Ok(bytes)) => self.decoder.add_bytes(&bytes)?,
                Some(Err(e)) => return Err(LlmError::Connection(e)),
                None => return Err(self.decoder.finish()),
            }
        }
    }
}

/// Ollama models list response
#[derive(Debug, Deserialize)]
struct ModelsResponse {
    models: Vec<ModelInfo>,
}

/// Model information
#[derive(Debug, Deserialize)]
struct ModelInfo {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = OllamaClient::new().unwrap();
        assert_eq!(client.base_url(), DEFAULT_OLLAMA_URL);
        assert_eq!(client.generate_url(), "http://localhost:11434/api/generate");
        assert_eq!(client.config().timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_client_with_config() {
        let client = OllamaClient::with_config(ClientConfig {
            base_url: "http://127.0.0.1:8080/".to_string(),
            generate_path: "/v1/generate".to_string(),
            timeout: None,
        })
        .unwrap();

        assert_eq!(client.base_url(), "http://127.0.0.1:8080");
        assert_eq!(client.generate_url(), "http://127.0.0.1:8080/v1/generate");
        assert!(client.config().timeout.is_none());
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let client =
            OllamaClient::with_config(ClientConfig::with_base_url(format!("http://127.0.0.1:{}", port)))
                .unwrap();
        let request = GenerationRequest::new("mistral", "hi");

        let result = client.generate(&request, |_| Ok(())).await;
        assert!(matches!(result, Err(LlmError::Connection(_))));
        assert!(!client.health_check().await.unwrap());
    }

    #[tokio::test]
    #[ignore] // Requires Ollama running
    async fn test_list_models_integration() {
        let client = OllamaClient::new().unwrap();
        assert!(client.list_models().await.is_ok());
    }
}
