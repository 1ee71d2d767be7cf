//! Response chunk of the generate endpoint
//!
//! One chunk per JSON record of the response body. Only the final chunk
//! (`done == true`) carries meaningful durations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single decoded record of a generation stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationChunk {
    #[serde(default)]
    pub model: String,

    /// Creation timestamp as sent by the server
    #[serde(default)]
    pub created_at: String,

    /// Text fragment produced for this chunk
    #[serde(rename = "response", default)]
    pub response_text: String,

    #[serde(default)]
    pub done: bool,

    /// Set when the server gave up mid-generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Final chunk only
    #[serde(default, with = "nanos")]
    pub total_duration: Duration,

    /// Final chunk only
    #[serde(default, with = "nanos")]
    pub load_duration: Duration,
}

impl GenerationChunk {
    /// Parse `created_at` as an RFC 3339 timestamp
    pub fn created_at_utc(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.created_at)
            .ok()
            .map(|ts| ts.with_timezone(&Utc))
    }
}

/// Durations are integer nanosecond counts on the wire
mod nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let nanos = u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX);
        serializer.serialize_u64(nanos)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
