//! Audio output timeline.
//!
//! Lays decoded chunks out gaplessly on the playback clock: each chunk
//! starts exactly where the previous one ends. If the clock overtakes the
//! planned start (tab suspension, slow delivery), the timeline resyncs
//! forward instead of scheduling audio in the past, a recoverable
//! buffer underrun, not an error.

use crate::config::AudioConfig;
use tracing::debug;

/// A chunk placed on the playback timeline, ready for the audio sink.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledChunk {
    /// Decoded samples to play.
    pub samples: Vec<i16>,
    /// Playback-clock instant (seconds) at which playback begins.
    pub start: f64,
    /// Chunk duration in seconds.
    pub duration: f64,
}

/// Playback timeline for one utterance.
///
/// Single-writer: only the session task mutates it. All times are seconds
/// on the session's playback clock.
#[derive(Debug)]
pub struct AudioTimeline {
    sample_rate: u32,
    /// Fixed scheduling cushion in seconds.
    lookahead: f64,
    /// Clock instant at which the next chunk will begin.
    next_start: f64,
    /// Clock instant at which the current utterance began, if one is live.
    stream_start: Option<f64>,
}

impl AudioTimeline {
    /// Creates a timeline for the given sample rate and lookahead cushion.
    pub fn new(sample_rate: u32, lookahead_secs: f64) -> Self {
        Self {
            sample_rate,
            lookahead: lookahead_secs,
            next_start: 0.0,
            stream_start: None,
        }
    }

    /// Creates a timeline from audio configuration.
    pub fn from_config(config: &AudioConfig) -> Self {
        Self::new(config.sample_rate, config.lookahead_ms as f64 / 1000.0)
    }

    /// Clock instant the current utterance started, or `None` when idle.
    pub fn stream_start(&self) -> Option<f64> {
        self.stream_start
    }

    /// Returns true while an utterance is in progress.
    pub fn is_active(&self) -> bool {
        self.stream_start.is_some()
    }

    /// Clock instant at which the next chunk would begin.
    pub fn next_start(&self) -> f64 {
        self.next_start
    }

    /// Places decoded samples on the timeline.
    ///
    /// First call since reset establishes the utterance:
    /// `stream_start = next_start = now + lookahead`. Subsequent calls
    /// append seamlessly, resyncing forward if the clock has overtaken
    /// `next_start`.
    pub fn enqueue(&mut self, samples: Vec<i16>, now: f64) -> ScheduledChunk {
        if self.stream_start.is_none() {
            let start = now + self.lookahead;
            self.stream_start = Some(start);
            self.next_start = start;
        } else if self.next_start < now {
            debug!(
                behind_secs = now - self.next_start,
                "playback clock overtook timeline, resyncing forward"
            );
            self.next_start = now + self.lookahead;
        }

        let start = self.next_start;
        let duration = samples.len() as f64 / self.sample_rate as f64;
        self.next_start = start + duration;

        ScheduledChunk {
            samples,
            start,
            duration,
        }
    }

    /// Drops the current utterance. Called on disconnect or explicit stop.
    pub fn reset(&mut self) {
        self.stream_start = None;
        self.next_start = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline() -> AudioTimeline {
        // 24kHz, 50ms lookahead
        AudioTimeline::new(24000, 0.05)
    }

    #[test]
    fn test_first_chunk_establishes_utterance() {
        let mut tl = timeline();
        assert!(!tl.is_active());

        let chunk = tl.enqueue(vec![0i16; 2400], 10.0);

        assert_eq!(tl.stream_start(), Some(10.05));
        assert!((chunk.start - 10.05).abs() < 1e-9);
        assert!((chunk.duration - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_chunks_are_gapless() {
        let mut tl = timeline();

        let first = tl.enqueue(vec![0i16; 2400], 0.0); // 100ms
        let second = tl.enqueue(vec![0i16; 4800], 0.0); // 200ms
        let third = tl.enqueue(vec![0i16; 2400], 0.0);

        assert!((second.start - (first.start + first.duration)).abs() < 1e-9);
        assert!((third.start - (second.start + second.duration)).abs() < 1e-9);
    }

    #[test]
    fn test_monotonic_start_times() {
        let mut tl = timeline();
        let mut last_end = 0.0;

        for len in [2400usize, 240, 24000, 1200] {
            let chunk = tl.enqueue(vec![0i16; len], 0.0);
            assert!(chunk.start >= last_end - 1e-9, "chunks must not overlap");
            last_end = chunk.start + chunk.duration;
        }
    }

    #[test]
    fn test_resync_after_clock_overtakes() {
        let mut tl = timeline();

        tl.enqueue(vec![0i16; 2400], 0.0);
        // Clock jumps well past next_start (e.g. suspended tab)
        let chunk = tl.enqueue(vec![0i16; 2400], 5.0);

        assert!((chunk.start - 5.05).abs() < 1e-9);
        // stream_start is untouched by the resync
        assert_eq!(tl.stream_start(), Some(0.05));
    }

    #[test]
    fn test_no_resync_while_ahead() {
        let mut tl = timeline();

        tl.enqueue(vec![0i16; 24000], 0.0); // 1s of audio, ends at 1.05
        let chunk = tl.enqueue(vec![0i16; 2400], 0.5);

        assert!((chunk.start - 1.05).abs() < 1e-9);
    }

    #[test]
    fn test_reset_clears_utterance() {
        let mut tl = timeline();
        tl.enqueue(vec![0i16; 2400], 1.0);
        assert!(tl.is_active());

        tl.reset();

        assert!(!tl.is_active());
        assert_eq!(tl.stream_start(), None);

        // Next chunk starts a fresh utterance relative to the new clock
        let chunk = tl.enqueue(vec![0i16; 2400], 7.0);
        assert!((chunk.start - 7.05).abs() < 1e-9);
        assert_eq!(tl.stream_start(), Some(7.05));
    }
}
