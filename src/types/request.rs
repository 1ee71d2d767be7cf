//! Request types for the generate endpoint
//!
//! A `GenerationRequest` is built once per call and never mutated after
//! construction; the builder methods consume and return `self`.

use serde::{Deserialize, Serialize};

/// Mirostat sampling mode, sent as the integer 0, 1 or 2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MirostatMode {
    #[default]
    Off,
    V1,
    V2,
}

impl From<MirostatMode> for u8 {
    fn from(mode: MirostatMode) -> Self {
        match mode {
            MirostatMode::Off => 0,
            MirostatMode::V1 => 1,
            MirostatMode::V2 => 2,
        }
    }
}

impl TryFrom<u8> for MirostatMode {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MirostatMode::Off),
            1 => Ok(MirostatMode::V1),
            2 => Ok(MirostatMode::V2),
            other => Err(format!("invalid mirostat mode {}, expected 0, 1 or 2", other)),
        }
    }
}

/// Sampling options passed through to the model
///
/// Unset fields are omitted from the request body so the server applies
/// its own defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SamplingOptions {
    /// Mirostat sampling for controlling perplexity (default: off)
    #[serde(rename = "mirostat", default, skip_serializing_if = "Option::is_none")]
    mirostat_mode: Option<MirostatMode>,

    /// How quickly mirostat reacts to feedback from the generated text (default: 0.1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mirostat_eta: Option<f64>,

    /// Balance between coherence and diversity of the output (default: 5.0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mirostat_tau: Option<f64>,

    /// Higher values make the model answer more creatively (default: 0.8)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,

    /// Same seed and prompt yield the same text (default: 0)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seed: Option<i64>,

    /// Stop sequences, in order
    #[serde(rename = "stop", default, skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,

    /// Lower values are more conservative (default: 40)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top_k: Option<u32>,

    /// Works together with top-k (default: 0.9)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    top_p: Option<f64>,
}

impl SamplingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mirostat(mut self, mode: MirostatMode, eta: f64, tau: f64) -> Self {
        self.mirostat_mode = Some(mode);
        self.mirostat_eta = Some(eta);
        self.mirostat_tau = Some(tau);
        self
    }

    pub fn with_temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_seed(mut self, seed: i64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_stop<I, S>(mut self, sequences: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_sequences = sequences.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_top_k(mut self, top_k: u32) -> Self {
        self.top_k = Some(top_k);
        self
    }

    pub fn with_top_p(mut self, top_p: f64) -> Self {
        self.top_p = Some(top_p);
        self
    }

    pub fn mirostat_mode(&self) -> MirostatMode {
        self.mirostat_mode.unwrap_or_default()
    }

    pub fn mirostat_eta(&self) -> Option<f64> {
        self.mirostat_eta
    }

    pub fn mirostat_tau(&self) -> Option<f64> {
        self.mirostat_tau
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn seed(&self) -> Option<i64> {
        self.seed
    }

    pub fn stop_sequences(&self) -> &[String] {
        &self.stop_sequences
    }

    pub fn top_k(&self) -> Option<u32> {
        self.top_k
    }

    pub fn top_p(&self) -> Option<f64> {
        self.top_p
    }
}

/// Body of `POST /api/generate`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: SamplingOptions,
}

impl GenerationRequest {
    /// Create a streaming request with default sampling options
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            prompt: prompt.into(),
            stream: true,
            options: SamplingOptions::default(),
        }
    }

    pub fn with_stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn with_options(mut self, options: SamplingOptions) -> Self {
        self.options = options;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn stream(&self) -> bool {
        self.stream
    }

    pub fn options(&self) -> &SamplingOptions {
        &self.options
    }
}
