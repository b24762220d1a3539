//! Audio sink port.
//!
//! The host (browser shell, native player) supplies the actual audio
//! output; the core only tells it what to play and when.

use std::sync::{Arc, Mutex};

/// Pluggable audio output handler.
///
/// Pairs with [`Renderer`](crate::render::Renderer) on the visual side;
/// this handles scheduled playback of decoded chunks.
pub trait AudioSink: Send + 'static {
    /// Schedule decoded samples to begin playing at `start_secs` on the
    /// playback clock. Chunks arrive in playback order and never overlap.
    fn play_at(&mut self, samples: &[i16], start_secs: f64);

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "sink"
    }
}

/// Discards all audio. Useful for headless runs and tests that only care
/// about the visual side.
pub struct NullSink;

impl AudioSink for NullSink {
    fn play_at(&mut self, _samples: &[i16], _start_secs: f64) {}

    fn name(&self) -> &'static str {
        "null"
    }
}

/// One playback record captured by [`CollectorSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayedChunk {
    pub start: f64,
    pub sample_count: usize,
}

/// Records scheduled playback for inspection (library and test use).
///
/// Clones share the same record list, so a clone kept by the caller sees
/// everything the session-owned sink received.
#[derive(Clone, Default)]
pub struct CollectorSink {
    played: Arc<Mutex<Vec<PlayedChunk>>>,
}

impl CollectorSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything played so far.
    pub fn played(&self) -> Vec<PlayedChunk> {
        match self.played.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl AudioSink for CollectorSink {
    fn play_at(&mut self, samples: &[i16], start_secs: f64) {
        let record = PlayedChunk {
            start: start_secs,
            sample_count: samples.len(),
        };
        match self.played.lock() {
            Ok(mut guard) => guard.push(record),
            Err(poisoned) => poisoned.into_inner().push(record),
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn audio_sink_is_object_safe() {
        let _sink: Box<dyn AudioSink> = Box::new(NullSink);
    }

    #[test]
    fn collector_sink_records_in_order() {
        let mut sink = CollectorSink::new();

        sink.play_at(&[0i16; 100], 1.0);
        sink.play_at(&[0i16; 200], 2.5);

        let played = sink.played();
        assert_eq!(played.len(), 2);
        assert_eq!(played[0].sample_count, 100);
        assert!((played[1].start - 2.5).abs() < 1e-9);
    }

    #[test]
    fn collector_sink_clones_share_records() {
        let sink = CollectorSink::new();
        let mut clone = sink.clone();

        clone.play_at(&[0i16; 10], 0.0);

        assert_eq!(sink.played().len(), 1);
    }

    #[test]
    fn null_sink_name() {
        assert_eq!(NullSink.name(), "null");
    }
}
