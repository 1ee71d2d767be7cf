//! llmi18n - Translate quoted strings with a local Ollama model
//!
//! A minimal client for the Ollama generate endpoint and a translation
//! layer on top of it.
//!
//! # Architecture
//!
//! - **types**: request and response chunk wire types
//! - **streaming**: HTTP client and incremental chunk decoder
//! - **translation**: prompt construction and the translator
//! - **telemetry**: per-call generation statistics
//! - **cli**: command-line arguments and TOML configuration

pub mod errors;
pub mod types;
pub mod streaming;
pub mod translation;
pub mod telemetry;
pub mod cli;

// Re-export commonly used types
pub use errors::{LlmError, Result};
pub use streaming::{ClientConfig, OllamaClient};
pub use translation::{Translation, TranslationConfig, Translator};
pub use types::{GenerationChunk, GenerationRequest, MirostatMode, SamplingOptions};
