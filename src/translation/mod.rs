//! Translation of quoted strings
//!
//! A thin layer over [`OllamaClient::generate`]: one fixed prompt, one call,
//! and the response text of the final chunk.

pub mod prompt;

pub use prompt::{build_prompt, translation_instruction, translation_prompt, DEFAULT_TARGET_LANGUAGE};

use crate::errors::Result;
use crate::streaming::OllamaClient;
use crate::telemetry::GenerationStats;
use crate::types::{GenerationRequest, SamplingOptions};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Default translation model
pub const DEFAULT_MODEL: &str = "mistral";

/// Model and sampling settings of a translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslationConfig {
    pub model: String,
    pub target_language: String,
    /// Must stay `false`, see [`Translator::translate_with_stats`]
    pub stream: bool,
    pub options: SamplingOptions,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            stream: false,
            options: SamplingOptions::new().with_temperature(0.3).with_seed(42),
        }
    }
}

/// Result of a translation call
#[derive(Debug, Clone)]
pub struct Translation {
    pub text: String,
    pub stats: GenerationStats,
}

/// Translates the quoted strings of a text blob
#[derive(Debug, Clone)]
pub struct Translator {
    client: OllamaClient,
    config: TranslationConfig,
}

impl Translator {
    pub fn new(client: OllamaClient, config: TranslationConfig) -> Self {
        Self { client, config }
    }

    /// Build the generation request for `text`
    pub fn request_for(&self, text: &str) -> GenerationRequest {
        GenerationRequest::new(
            self.config.model.clone(),
            translation_prompt(text, &self.config.target_language),
        )
        .with_stream(self.config.stream)
        .with_options(self.config.options.clone())
    }

    /// Translate the quoted strings of `text`
    pub async fn translate(&self, text: &str) -> Result<String> {
        Ok(self.translate_with_stats(text).await?.text)
    }

    /// Translate and keep the call statistics
    ///
    /// Each chunk overwrites the previous response text. With `stream =
    /// false` the only chunk holds the whole text; a streamed call would
    /// keep only its last fragment.
    pub async fn translate_with_stats(&self, text: &str) -> Result<Translation> {
        let request = self.request_for(text);
        let mut latest = String::new();
        let mut stats = GenerationStats::start();

        self.client
            .generate(&request, |chunk| {
                stats.record(&chunk);
                if chunk.done {
                    info!(
                        model = %chunk.model,
                        total_duration = ?chunk.total_duration,
                        load_duration = ?chunk.load_duration,
                        "translation finished"
                    );
                }
                latest = chunk.response_text;
                Ok(())
            })
            .await?;

        Ok(Translation {
            text: latest,
            stats,
        })
    }

    pub fn config(&self) -> &TranslationConfig {
        &self.config
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TranslationConfig::default();
        assert_eq!(config.model, "mistral");
        assert_eq!(config.target_language, "de");
        assert!(!config.stream);
        assert_eq!(config.options.temperature(), Some(0.3));
        assert_eq!(config.options.seed(), Some(42));
    }

    #[test]
    fn test_request_for() {
        let translator = Translator::new(OllamaClient::new().unwrap(), TranslationConfig::default());
        let request = translator.request_for("one: \"Translation\"");

        assert_eq!(request.model(), "mistral");
        assert!(!request.stream());
        assert!(request.prompt().starts_with("one: \"Translation\""));
        assert!(request.prompt().contains("to de."));
        assert_eq!(request.options().seed(), Some(42));
    }
}
