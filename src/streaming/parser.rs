//! Incremental decoder for streamed generation responses
//!
//! Network reads do not line up with JSON records: a record may span several
//! reads and one read may carry several records. The decoder buffers bytes
//! and extracts complete top-level objects with a bracket-matching pass:
//! - Buffer: 1MB per streamed record, 64MB for a single unstreamed reply
//! - Algorithm: O(n) single pass bracket matching
//! - Separators: any ASCII whitespace between objects

use crate::errors::{LlmError, Result};
use crate::types::GenerationChunk;

/// Maximum buffer size (1MB)
///
/// A streamed record holds one token or so; anything near this size is a
/// misbehaving server.
pub const MAX_BUFFER_SIZE: usize = 1_048_576;

/// Maximum buffer size when `stream = false` (64MB)
///
/// The single record then carries the whole generated text.
pub const MAX_UNSTREAMED_BUFFER_SIZE: usize = 64 * 1_048_576;

/// Incremental JSON object decoder
#[derive(Debug)]
pub struct ChunkDecoder {
    /// Accumulation buffer
    buffer: Vec<u8>,

    /// Maximum buffer size
    max_buffer_size: usize,
}

impl ChunkDecoder {
    /// Create new decoder with default settings
    pub fn new() -> Self {
        Self::with_capacity(MAX_BUFFER_SIZE)
    }

    /// Create decoder with custom buffer capacity
    pub fn with_capacity(max_buffer_size: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(4096),
            max_buffer_size,
        }
    }

    /// Append bytes read from the response body
    pub fn add_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        if self.buffer.len() + bytes.len() > self.max_buffer_size {
            return Err(LlmError::Decode(format!(
                "Buffer overflow: {} bytes exceeds maximum {}",
                self.buffer.len() + bytes.len(),
                self.max_buffer_size
            )));
        }

        self.buffer.extend_from_slice(bytes);
        Ok(())
    }

    /// Extract the next complete JSON object, if the buffer holds one
    ///
    /// # Algorithm
    ///
    /// ```text
    /// depth ← 0, start ← None
    /// For each byte bᵢ outside a string literal:
    ///   depth = 0: skip whitespace, '{' opens (start ← i), anything else fails
    ///   '{': depth ← depth + 1
    ///   '}': depth ← depth - 1; depth = 0 ⇒ return B[start..=i]
    /// Return None  // no complete object yet
    /// ```
    pub fn next_object(&mut self) -> Result<Option<String>> {
        match self.find_complete_object()? {
            Some((start, end)) => {
                let object = self.buffer[start..=end].to_vec();
                self.buffer.drain(..=end);

                String::from_utf8(object)
                    .map(Some)
                    .map_err(|e| LlmError::Decode(format!("Invalid UTF-8 in record: {}", e)))
            }
            None => {
                if self.buffer.iter().all(u8::is_ascii_whitespace) {
                    self.buffer.clear();
                }
                Ok(None)
            }
        }
    }

    /// Decode the next complete record into a [`GenerationChunk`]
    ///
    /// A record carrying an `error` field becomes [`LlmError::Server`].
    pub fn decode_next(&mut self) -> Result<Option<GenerationChunk>> {
        let json = match self.next_object()? {
            Some(json) => json,
            None => return Ok(None),
        };

        let chunk: GenerationChunk = serde_json::from_str(&json)
            .map_err(|e| LlmError::Decode(format!("Invalid generation record: {}", e)))?;

        match chunk.error {
            Some(message) => Err(LlmError::Server(message)),
            None => Ok(Some(chunk)),
        }
    }

    /// Error to report when the body ends before a `done` chunk
    pub fn finish(&self) -> LlmError {
        let pending_bytes = self
            .buffer
            .iter()
            .filter(|b| !b.is_ascii_whitespace())
            .count();
        LlmError::UnexpectedEof { pending_bytes }
    }

    /// Find a complete top-level object
    ///
    /// Returns: Some((start_index, end_index)) or None
    fn find_complete_object(&self) -> Result<Option<(usize, usize)>> {
        let mut depth = 0usize;
        let mut start = 0usize;
        let mut in_string = false;
        let mut escape_next = false;

        for (i, &byte) in self.buffer.iter().enumerate() {
            if depth == 0 {
                match byte {
                    b'{' => {
                        start = i;
                        depth = 1;
                    }
                    b if b.is_ascii_whitespace() => {}
                    other => {
                        return Err(LlmError::Decode(format!(
                            "Unexpected byte 0x{:02x} outside of a JSON object",
                            other
                        )));
                    }
                }
                continue;
            }

            if escape_next {
                escape_next = false;
                continue;
            }

            // Braces inside strings do not count
            if in_string {
                match byte {
                    b'\\' => escape_next = true,
                    b'"' => in_string = false,
                    _ => {}
                }
                continue;
            }

            match byte {
                b'"' => in_string = true,
                b'{' => depth += 1,
                b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(Some((start, i)));
                    }
                }
                _ => {}
            }
        }

        Ok(None)
    }

    /// Get current buffer size
    pub fn buffer_size(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Clear the buffer
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

impl Default for ChunkDecoder {
    fn default() -> Self {
        Self::new()
    }
}
