//! Visual command queue and sync scheduler.
//!
//! Buffers instructions that arrive before any narration audio exists and,
//! once a timeline is live, decides how long each one waits before being
//! realized. The delay is a fixed-bucket approximation of narration lead
//! time; the vendor gives no ground-truth offset, so the contract is only
//! "the visual appears shortly after the audio that introduces it".

use crate::config::SyncConfig;
use crate::visual::instruction::VisualInstruction;
use std::collections::VecDeque;

/// An instruction waiting for a playback timeline, with arrival order kept.
#[derive(Debug, Clone)]
pub struct QueuedVisual {
    pub instruction: VisualInstruction,
    /// Playback-clock instant (seconds) at which the instruction arrived.
    pub arrival: f64,
}

/// An instruction with its computed realization delay.
#[derive(Debug, Clone)]
pub struct ScheduledVisual {
    pub instruction: VisualInstruction,
    /// Seconds to wait before handing the instruction to the renderer.
    pub delay: f64,
}

/// FIFO queue plus the narration-lead delay heuristic.
///
/// Single-writer: only the session task mutates it.
pub struct VisualQueue {
    config: SyncConfig,
    queue: VecDeque<QueuedVisual>,
}

impl VisualQueue {
    /// Creates a queue with default scheduling configuration.
    pub fn new() -> Self {
        Self::with_config(SyncConfig::default())
    }

    /// Creates a queue with custom scheduling configuration.
    pub fn with_config(config: SyncConfig) -> Self {
        Self {
            config,
            queue: VecDeque::new(),
        }
    }

    /// Number of instructions waiting for a timeline.
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Offers an instruction to the scheduler.
    ///
    /// With no utterance in progress (`stream_start` is `None`) the
    /// instruction is queued and `None` is returned. With a live timeline
    /// the realization delay is computed from how far the narration has
    /// progressed; the instruction is never realized synchronously inline.
    pub fn offer(
        &mut self,
        instruction: VisualInstruction,
        now: f64,
        stream_start: Option<f64>,
    ) -> Option<ScheduledVisual> {
        match stream_start {
            None => {
                self.queue.push_back(QueuedVisual {
                    instruction,
                    arrival: now,
                });
                None
            }
            Some(start) => {
                let delay = self.delay_for(now - start);
                Some(ScheduledVisual { instruction, delay })
            }
        }
    }

    /// Drains the entire queue, assigning staggered delays.
    ///
    /// Snapshot-then-clear: an instruction offered during scheduling of the
    /// drained batch can neither be lost nor double-scheduled. Instruction
    /// at index `i` gets `flush_base + i × flush_stagger`, clamped to
    /// `max_stagger`; the clamp is monotone so arrival order is preserved.
    pub fn flush(&mut self) -> Vec<ScheduledVisual> {
        let drained: Vec<QueuedVisual> = self.queue.drain(..).collect();

        let base = self.config.flush_base_ms as f64 / 1000.0;
        let stagger = self.config.flush_stagger_ms as f64 / 1000.0;
        let cap = self.config.max_stagger_ms as f64 / 1000.0;

        drained
            .into_iter()
            .enumerate()
            .map(|(i, queued)| ScheduledVisual {
                instruction: queued.instruction,
                delay: (base + i as f64 * stagger).min(cap),
            })
            .collect()
    }

    /// Drops everything queued. Visuals from a prior utterance must never
    /// realize after a reset.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    /// Narration-lead heuristic: freshly started narration gets the longest
    /// lead, warmed-up narration a short one, steady state the default.
    fn delay_for(&self, elapsed: f64) -> f64 {
        let early_phase = self.config.early_phase_ms as f64 / 1000.0;
        let mid_phase = self.config.mid_phase_ms as f64 / 1000.0;

        if elapsed < early_phase {
            self.config.early_delay_ms as f64 / 1000.0
        } else if elapsed < mid_phase {
            self.config.mid_delay_ms as f64 / 1000.0
        } else {
            self.config.default_delay_ms as f64 / 1000.0
        }
    }
}

impl Default for VisualQueue {
    fn default() -> Self {
        Self::new()
    }
}
