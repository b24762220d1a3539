//! Default configuration constants for chalkboard.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Default audio sample rate in Hz.
///
/// 24kHz mono is what the vendor's realtime voice API streams; chunks are
/// interpreted at this rate unless the config says otherwise.
pub const SAMPLE_RATE: u32 = 24000;

/// Scheduling cushion in milliseconds between "now" and the start of the
/// next scheduled chunk.
///
/// Gives the audio output collaborator a small window to accept the buffer
/// before its start time passes.
pub const LOOKAHEAD_MS: u64 = 50;

/// Elapsed-narration boundary (ms) below which a visual is considered to
/// arrive at the very start of an utterance.
pub const EARLY_PHASE_MS: u64 = 500;

/// Elapsed-narration boundary (ms) below which a visual is considered to
/// arrive while the narration is still warming up.
pub const MID_PHASE_MS: u64 = 2000;

/// Realization delay (ms) for visuals arriving in the early phase.
///
/// The narration has barely started, so give it a full second of lead
/// before anything appears on the board.
pub const EARLY_DELAY_MS: u64 = 1000;

/// Realization delay (ms) for visuals arriving in the mid phase.
pub const MID_DELAY_MS: u64 = 500;

/// Realization delay (ms) for visuals arriving once narration is underway.
pub const DEFAULT_DELAY_MS: u64 = 800;

/// Base delay (ms) applied to the first instruction of a batch flush.
pub const FLUSH_BASE_MS: u64 = 800;

/// Per-instruction stagger increment (ms) within a batch flush.
///
/// Keeps a burst of queued visuals from appearing all at once; each one
/// trails the previous by this much.
pub const FLUSH_STAGGER_MS: u64 = 300;

/// Upper bound (ms) on any single staggered delay.
///
/// Stagger growth is otherwise unbounded for very long bursts; the clamp is
/// monotone so arrival order is still preserved.
pub const MAX_STAGGER_MS: u64 = 5000;

/// Steps shown per solution page.
pub const PAGE_SIZE: usize = 3;

/// Minimum reading time (ms) granted to a solution step regardless of length.
pub const MIN_READING_MS: u64 = 400;

/// Reading time (ms) granted per character of step text.
pub const PER_CHAR_MS: u64 = 25;

/// Lead-in (ms) before the first step of a solution is revealed.
pub const LEAD_IN_MS: u64 = 300;

/// Grace period (ms) after the last step's reading window before the
/// animating flag clears.
pub const GRACE_MS: u64 = 1000;

/// Number of sample points taken across a graph's domain.
///
/// One sample per horizontal pixel at the reference canvas width.
pub const GRAPH_SAMPLES: u32 = 600;

/// Magnitude bound for plotted graph values.
///
/// Samples beyond ±this are omitted, producing a visual gap instead of a
/// distorted spike.
pub const GRAPH_MAGNITUDE_BOUND: f64 = 100.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delay_buckets_are_ordered() {
        assert!(EARLY_PHASE_MS < MID_PHASE_MS);
        assert!(MID_DELAY_MS < DEFAULT_DELAY_MS);
        assert!(DEFAULT_DELAY_MS < EARLY_DELAY_MS);
    }

    #[test]
    fn stagger_cap_exceeds_base() {
        assert!(MAX_STAGGER_MS > FLUSH_BASE_MS + FLUSH_STAGGER_MS);
    }
}
