//! Streaming client module
//!
//! Provides the Ollama generate client and the incremental chunk decoder.

pub mod client;
pub mod parser;

// Re-export commonly used types
pub use client::{
    ClientConfig, OllamaClient, DEFAULT_GENERATE_PATH, DEFAULT_OLLAMA_URL, DEFAULT_TIMEOUT,
};
pub use parser::{ChunkDecoder, MAX_BUFFER_SIZE, MAX_UNSTREAMED_BUFFER_SIZE};
