//! Type definitions module
//!
//! Wire types of the generate endpoint.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::{GenerationRequest, MirostatMode, SamplingOptions};
pub use response::GenerationChunk;
