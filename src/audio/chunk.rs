//! Audio chunk type crossing the bridge boundary.

use crate::error::{ChalkboardError, Result};

/// Opaque PCM buffer received from the vendor bridge.
///
/// Payload is little-endian 16-bit mono PCM at the session's fixed sample
/// rate. Immutable once received; consumed exactly once by the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    pub payload: Vec<u8>,
}

impl AudioChunk {
    /// Wraps a raw payload as received from the network collaborator.
    pub fn new(payload: Vec<u8>) -> Self {
        Self { payload }
    }

    /// Encodes i16 samples into a chunk (test and demo helper).
    pub fn from_samples(samples: &[i16]) -> Self {
        let mut payload = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            payload.extend_from_slice(&sample.to_le_bytes());
        }
        Self { payload }
    }

    /// Decodes the payload into 16-bit samples.
    ///
    /// Empty or odd-length payloads are malformed; the caller logs and
    /// skips them without touching the timeline.
    pub fn decode(&self) -> Result<Vec<i16>> {
        if self.payload.is_empty() {
            return Err(ChalkboardError::ChunkDecode {
                message: "empty payload".to_string(),
            });
        }
        if self.payload.len() % 2 != 0 {
            return Err(ChalkboardError::ChunkDecode {
                message: format!("odd byte length {}", self.payload.len()),
            });
        }

        Ok(self
            .payload
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect())
    }
}
