//! Staged reveal controller.
//!
//! Paginates a multi-step solution and reveals each step on a self-paced
//! schedule proportional to its text length. This path is not anchored to
//! the audio timeline: no reliable step-to-audio offset exists, so the
//! pacing models a reader working through the steps instead.
//!
//! Every schedule carries a generation number. Timers from a pre-empted
//! solution check the generation at fire time and drop their effects, so a
//! stale reveal can never touch a newer solution's state.

use crate::config::RevealConfig;
use std::time::Duration;

/// One solution step with its reveal flag.
///
/// `revealed` never reverts to false within the lifetime of a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub text: String,
    pub revealed: bool,
}

/// A single timed reveal within a solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevealTask {
    /// Offset from the start of the solution animation.
    pub offset: Duration,
    /// Global 0-based step index.
    pub step: usize,
}

/// The full timer plan for one solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevealSchedule {
    /// Liveness token; effects are dropped if the controller has moved on.
    pub generation: u64,
    /// One task per step, in strictly non-decreasing offset order.
    pub tasks: Vec<RevealTask>,
    /// When the animating flag clears (last reading window plus grace).
    pub done_at: Duration,
}

/// Read-only pagination state published to the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RevealSnapshot {
    pub title: String,
    pub current_page: usize,
    pub page_count: usize,
    pub revealed: Vec<bool>,
    pub is_animating: bool,
}

/// State machine for the active staged solution.
///
/// `Idle → Paginating → Revealing → Idle`; pages remain on screen after
/// the animation until the next instruction replaces them.
pub struct RevealController {
    config: RevealConfig,
    title: String,
    steps: Vec<Step>,
    current_page: usize,
    is_animating: bool,
    generation: u64,
}

impl RevealController {
    /// Creates a controller with default configuration.
    pub fn new() -> Self {
        Self::with_config(RevealConfig::default())
    }

    /// Creates a controller with custom configuration.
    pub fn with_config(mut config: RevealConfig) -> Self {
        // A zero page size would make pagination degenerate
        config.page_size = config.page_size.max(1);
        Self {
            config,
            title: String::new(),
            steps: Vec::new(),
            current_page: 0,
            is_animating: false,
            generation: 0,
        }
    }

    /// Starts a new staged solution, replacing any prior pagination state.
    ///
    /// Returns the reveal schedule for the caller to submit as timers. An
    /// empty step list produces an empty schedule and stays idle.
    pub fn begin(&mut self, title: String, steps: Vec<String>) -> RevealSchedule {
        self.generation += 1;
        self.title = title;
        self.steps = steps
            .into_iter()
            .map(|text| Step {
                text,
                revealed: false,
            })
            .collect();
        self.current_page = 0;
        self.is_animating = !self.steps.is_empty();

        let mut tasks = Vec::with_capacity(self.steps.len());
        let mut offset = Duration::from_millis(self.config.lead_in_ms);
        for (step, entry) in self.steps.iter().enumerate() {
            tasks.push(RevealTask { offset, step });
            offset += self.reading_time(&entry.text);
        }

        let done_at = if self.steps.is_empty() {
            Duration::ZERO
        } else {
            offset + Duration::from_millis(self.config.grace_ms)
        };

        RevealSchedule {
            generation: self.generation,
            tasks,
            done_at,
        }
    }

    /// Applies a scheduled reveal: switches the displayed page to the
    /// step's page if it differs and marks the step revealed, as one
    /// state change. Returns false (and does nothing) for a stale
    /// generation or out-of-range step.
    pub fn apply_reveal(&mut self, generation: u64, step: usize) -> bool {
        if generation != self.generation || step >= self.steps.len() {
            return false;
        }

        let page = step / self.config.page_size;
        if page != self.current_page {
            self.current_page = page;
        }
        self.steps[step].revealed = true;
        true
    }

    /// Clears the animating flag once the grace period has elapsed.
    /// Pages stay on screen. Returns false for a stale generation.
    pub fn finish(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.is_animating = false;
        true
    }

    /// Manual navigation, permitted at any time including mid-animation.
    /// Clamps to the valid page range and never touches revealed flags
    /// or pending timers.
    pub fn go_to_page(&mut self, page: usize) {
        self.current_page = page.min(self.page_count().saturating_sub(1));
    }

    /// Drops all pagination state and invalidates pending timers.
    ///
    /// Called when any non-sequence instruction pre-empts the solution,
    /// and on session reset.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.title.clear();
        self.steps.clear();
        self.current_page = 0;
        self.is_animating = false;
    }

    /// Current solution title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Total page count for the active solution.
    pub fn page_count(&self) -> usize {
        self.steps.len().div_ceil(self.config.page_size)
    }

    /// Currently displayed page index.
    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// True while reveals are still scheduled or in their grace period.
    pub fn is_animating(&self) -> bool {
        self.is_animating
    }

    /// Revealed flag for the step at global index `step`.
    pub fn step_revealed(&self, step: usize) -> bool {
        self.steps.get(step).is_some_and(|s| s.revealed)
    }

    /// Steps on the given page, in order.
    pub fn page(&self, page: usize) -> &[Step] {
        let start = page * self.config.page_size;
        let end = (start + self.config.page_size).min(self.steps.len());
        if start >= self.steps.len() {
            &[]
        } else {
            &self.steps[start..end]
        }
    }

    /// Snapshot of the read surface the UI paints pagination from.
    pub fn snapshot(&self) -> RevealSnapshot {
        RevealSnapshot {
            title: self.title.clone(),
            current_page: self.current_page,
            page_count: self.page_count(),
            revealed: self.steps.iter().map(|s| s.revealed).collect(),
            is_animating: self.is_animating,
        }
    }

    /// Reading time for one step: `max(min_reading, len × per_char)`.
    fn reading_time(&self, text: &str) -> Duration {
        let by_length = text.chars().count() as u64 * self.config.per_char_ms;
        Duration::from_millis(by_length.max(self.config.min_reading_ms))
    }
}

impl Default for RevealController {
    fn default() -> Self {
        Self::new()
    }
}
