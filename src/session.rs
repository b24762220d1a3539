//! Session orchestrator.
//!
//! Owns the audio timeline, the visual queue, and the reveal controller,
//! and multiplexes the bridge's event stream against its own timers on a
//! single task:
//!
//! ```text
//! ┌──────────┐  events   ┌─────────────────────────────┐
//! │  Bridge  │──────────▶│           Session           │
//! │  + UI    │           │ timeline │ queue │ reveal   │
//! └──────────┘           └──────┬──────────────┬───────┘
//!                          timers│              │watch
//!                               ▼              ▼
//!                        Renderer/Sink   RevealSnapshot (UI)
//! ```
//!
//! All state is single-writer: only this task mutates it, so no locks are
//! needed. Every timer carries a liveness token (utterance or solution
//! generation) and checks it at fire time, so effects from pre-empted or
//! reset work are dropped when they fire, not merely when submitted.

use crate::audio::{AudioChunk, AudioSink, AudioTimeline};
use crate::config::Config;
use crate::error::{ChalkboardError, Result};
use crate::render::Renderer;
use crate::visual::{
    RevealController, RevealSnapshot, ScheduledVisual, VisualInstruction, VisualQueue,
};
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, warn};

/// Event channel depth between the bridge/UI and the session task.
const EVENT_BUFFER_SIZE: usize = 64;

/// Connectivity signal from the transport collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
    Error(String),
}

/// Everything the session consumes, from the bridge and from the UI.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Narration audio chunk from the vendor bridge.
    Audio(AudioChunk),
    /// Classified draw instruction from the vendor bridge.
    Visual(VisualInstruction),
    /// User-triggered pagination from the UI layer.
    GoToPage(usize),
    /// Connectivity change from the transport layer.
    Status(ConnectionStatus),
    /// Shut the session down.
    Stop,
}

/// Deferred effect fired by the timer queue.
#[derive(Debug, Clone)]
enum TimerEffect {
    /// Hand a delayed instruction to the renderer, if its utterance is
    /// still the live one.
    RealizeVisual {
        instruction: VisualInstruction,
        utterance: u64,
    },
    /// Reveal one solution step, if its solution is still the live one.
    RevealStep { generation: u64, step: usize },
    /// Clear the animating flag after the grace period.
    RevealDone { generation: u64 },
}

/// Heap entry ordered by deadline, then submission order.
#[derive(Debug, Clone)]
struct TimerEntry {
    /// Deadline as an offset from the session epoch.
    due: Duration,
    /// Tie-break so same-deadline timers fire in submission order.
    seq: u64,
    effect: TimerEffect,
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for TimerEntry {}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.due, self.seq).cmp(&(other.due, other.seq))
    }
}

/// Handle to a running session.
///
/// The bridge pushes events through it; the UI reads pagination state from
/// the watch channel and sends navigation through the same event stream.
pub struct SessionHandle {
    events: mpsc::Sender<SessionEvent>,
    snapshot: watch::Receiver<RevealSnapshot>,
    join: JoinHandle<()>,
}

impl SessionHandle {
    /// Sends one event to the session.
    pub async fn send(&self, event: SessionEvent) -> Result<()> {
        self.events
            .send(event)
            .await
            .map_err(|_| ChalkboardError::ChannelClosed {
                message: "session task ended".to_string(),
            })
    }

    /// Forwards a narration audio chunk.
    pub async fn offer_audio(&self, chunk: AudioChunk) -> Result<()> {
        self.send(SessionEvent::Audio(chunk)).await
    }

    /// Forwards a classified draw instruction.
    pub async fn offer_visual(&self, instruction: VisualInstruction) -> Result<()> {
        self.send(SessionEvent::Visual(instruction)).await
    }

    /// Forwards user pagination.
    pub async fn go_to_page(&self, page: usize) -> Result<()> {
        self.send(SessionEvent::GoToPage(page)).await
    }

    /// Forwards a connectivity change.
    pub async fn set_status(&self, status: ConnectionStatus) -> Result<()> {
        self.send(SessionEvent::Status(status)).await
    }

    /// Latest pagination state for the UI to paint.
    pub fn snapshot(&self) -> RevealSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Subscribes to pagination state changes.
    pub fn subscribe(&self) -> watch::Receiver<RevealSnapshot> {
        self.snapshot.clone()
    }

    /// Stops the session and waits for the task to finish.
    pub async fn shutdown(self) {
        let _ = self.events.send(SessionEvent::Stop).await;
        if let Err(e) = self.join.await {
            warn!(error = %e, "session task did not shut down cleanly");
        }
    }
}

/// The synchronization core: one task owning all scheduler state.
pub struct Session {
    timeline: AudioTimeline,
    queue: VisualQueue,
    reveal: RevealController,
    renderer: Box<dyn Renderer>,
    sink: Box<dyn AudioSink>,
    timers: BinaryHeap<Reverse<TimerEntry>>,
    next_seq: u64,
    /// Bumped on every reset; realize timers from older utterances are
    /// dropped at fire time.
    utterance: u64,
    /// Playback-clock origin; all times are offsets from here.
    epoch: Instant,
    snapshot_tx: watch::Sender<RevealSnapshot>,
}

impl Session {
    /// Creates a session and the watch channel its UI reads from.
    pub fn new(
        config: &Config,
        renderer: Box<dyn Renderer>,
        sink: Box<dyn AudioSink>,
    ) -> (Self, watch::Receiver<RevealSnapshot>) {
        let (snapshot_tx, snapshot_rx) = watch::channel(RevealSnapshot::default());
        let session = Self {
            timeline: AudioTimeline::from_config(&config.audio),
            queue: VisualQueue::with_config(config.sync.clone()),
            reveal: RevealController::with_config(config.reveal.clone()),
            renderer,
            sink,
            timers: BinaryHeap::new(),
            next_seq: 0,
            utterance: 0,
            epoch: Instant::now(),
            snapshot_tx,
        };
        (session, snapshot_rx)
    }

    /// Spawns a session task and returns the handle for feeding it.
    pub fn spawn(
        config: &Config,
        renderer: Box<dyn Renderer>,
        sink: Box<dyn AudioSink>,
    ) -> SessionHandle {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER_SIZE);
        let (session, snapshot) = Self::new(config, renderer, sink);
        let join = tokio::spawn(session.run(events_rx));
        SessionHandle {
            events: events_tx,
            snapshot,
            join,
        }
    }

    /// Runs the event loop until `Stop` arrives or the channel closes.
    pub async fn run(mut self, mut events: mpsc::Receiver<SessionEvent>) {
        debug!("session loop started");
        loop {
            let next_due = self
                .timers
                .peek()
                .map(|Reverse(entry)| self.epoch + entry.due);
            let deadline = next_due.unwrap_or_else(|| Instant::now() + Duration::from_secs(3600));

            tokio::select! {
                event = events.recv() => match event {
                    Some(SessionEvent::Stop) | None => break,
                    Some(event) => self.handle_event(event),
                },
                _ = sleep_until(deadline), if next_due.is_some() => self.fire_due(),
            }
        }
        debug!("session loop stopped");
    }

    fn handle_event(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Audio(chunk) => self.handle_audio(chunk),
            SessionEvent::Visual(instruction) => self.handle_visual(instruction),
            SessionEvent::GoToPage(page) => {
                self.reveal.go_to_page(page);
                self.publish();
            }
            SessionEvent::Status(status) => self.handle_status(status),
            SessionEvent::Stop => {}
        }
    }

    /// Decode, lay out on the timeline, hand to the sink, then give the
    /// visual queue its chance to flush against the (possibly brand-new)
    /// timeline.
    fn handle_audio(&mut self, chunk: AudioChunk) {
        let samples = match chunk.decode() {
            Ok(samples) => samples,
            Err(e) => {
                warn!(error = %e, "skipping malformed audio chunk");
                return;
            }
        };

        let now = self.now();
        let scheduled = self.timeline.enqueue(samples, now);
        self.sink.play_at(&scheduled.samples, scheduled.start);

        if !self.queue.is_empty() {
            let flushed = self.queue.flush();
            debug!(count = flushed.len(), "flushing queued visuals");
            for visual in flushed {
                self.schedule_visual(visual);
            }
        }
    }

    fn handle_visual(&mut self, instruction: VisualInstruction) {
        debug!(kind = instruction.kind(), "visual instruction arrived");

        if instruction.is_sequence() {
            // Staged solutions bypass the sync scheduler entirely; the
            // renderer clears the canvas and paints the title now.
            self.renderer.realize(&instruction);
            if let VisualInstruction::SequenceAnimate { title, steps } = instruction {
                let schedule = self.reveal.begin(title, steps);
                for task in &schedule.tasks {
                    self.schedule(
                        task.offset,
                        TimerEffect::RevealStep {
                            generation: schedule.generation,
                            step: task.step,
                        },
                    );
                }
                if self.reveal.is_animating() {
                    self.schedule(
                        schedule.done_at,
                        TimerEffect::RevealDone {
                            generation: schedule.generation,
                        },
                    );
                }
                self.publish();
            }
            return;
        }

        // A new simple visual always pre-empts an in-progress staged
        // solution, whether or not the visual itself realizes soon.
        if self.reveal.page_count() > 0 || self.reveal.is_animating() {
            self.reveal.clear();
            self.publish();
        }

        let now = self.now();
        let stream_start = self.timeline.stream_start();
        match self.queue.offer(instruction, now, stream_start) {
            Some(scheduled) => self.schedule_visual(scheduled),
            None => debug!("queued visual until narration begins"),
        }
    }

    fn handle_status(&mut self, status: ConnectionStatus) {
        match status {
            ConnectionStatus::Connected => debug!("bridge connected"),
            ConnectionStatus::Disconnected => {
                info!("bridge disconnected, resetting session");
                self.reset();
            }
            ConnectionStatus::Error(message) => {
                warn!(%message, "bridge error, resetting session");
                self.reset();
            }
        }
    }

    /// Invalidate the utterance: stale queued visuals are dropped now and
    /// already-submitted timers are dropped when they fire.
    fn reset(&mut self) {
        self.timeline.reset();
        self.queue.clear();
        self.reveal.clear();
        self.utterance += 1;
        self.publish();
    }

    fn schedule_visual(&mut self, visual: ScheduledVisual) {
        let ScheduledVisual { instruction, delay } = visual;
        self.schedule(
            Duration::from_secs_f64(delay),
            TimerEffect::RealizeVisual {
                instruction,
                utterance: self.utterance,
            },
        );
    }

    fn schedule(&mut self, delay: Duration, effect: TimerEffect) {
        let entry = TimerEntry {
            due: self.epoch.elapsed() + delay,
            seq: self.next_seq,
            effect,
        };
        self.next_seq += 1;
        self.timers.push(Reverse(entry));
    }

    /// Fires every timer whose deadline has passed, in deadline order.
    fn fire_due(&mut self) {
        let now = self.epoch.elapsed();
        loop {
            let due = match self.timers.peek() {
                Some(Reverse(entry)) => entry.due,
                None => break,
            };
            if due > now {
                break;
            }
            if let Some(Reverse(entry)) = self.timers.pop() {
                self.apply(entry.effect);
            }
        }
    }

    fn apply(&mut self, effect: TimerEffect) {
        match effect {
            TimerEffect::RealizeVisual {
                instruction,
                utterance,
            } => {
                if utterance == self.utterance {
                    self.renderer.realize(&instruction);
                } else {
                    debug!(
                        kind = instruction.kind(),
                        "dropping visual from a reset utterance"
                    );
                }
            }
            TimerEffect::RevealStep { generation, step } => {
                if self.reveal.apply_reveal(generation, step) {
                    self.publish();
                }
            }
            TimerEffect::RevealDone { generation } => {
                if self.reveal.finish(generation) {
                    self.publish();
                }
            }
        }
    }

    fn publish(&self) {
        self.snapshot_tx.send_replace(self.reveal.snapshot());
    }

    /// Seconds on the playback clock since the session epoch.
    fn now(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::CollectorSink;
    use crate::render::CollectorRenderer;

    #[test]
    fn test_timer_entries_order_by_deadline_then_seq() {
        let effect = TimerEffect::RevealDone { generation: 0 };
        let early = TimerEntry {
            due: Duration::from_millis(100),
            seq: 5,
            effect: effect.clone(),
        };
        let late = TimerEntry {
            due: Duration::from_millis(200),
            seq: 1,
            effect: effect.clone(),
        };
        let tied = TimerEntry {
            due: Duration::from_millis(100),
            seq: 6,
            effect,
        };

        assert!(early < late);
        assert!(early < tied);

        let mut heap = BinaryHeap::new();
        heap.push(Reverse(late.clone()));
        heap.push(Reverse(tied.clone()));
        heap.push(Reverse(early.clone()));

        assert_eq!(heap.pop().map(|Reverse(e)| e.seq), Some(5));
        assert_eq!(heap.pop().map(|Reverse(e)| e.seq), Some(6));
        assert_eq!(heap.pop().map(|Reverse(e)| e.seq), Some(1));
    }

    #[tokio::test]
    async fn test_spawn_and_shutdown() {
        let handle = Session::spawn(
            &Config::default(),
            Box::new(CollectorRenderer::new()),
            Box::new(CollectorSink::new()),
        );

        handle
            .set_status(ConnectionStatus::Connected)
            .await
            .unwrap();
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn test_malformed_chunk_is_skipped() {
        let sink = CollectorSink::new();
        let handle = Session::spawn(
            &Config::default(),
            Box::new(CollectorRenderer::new()),
            Box::new(sink.clone()),
        );

        handle.offer_audio(AudioChunk::new(vec![1, 2, 3])).await.unwrap();
        handle.shutdown().await;

        assert!(sink.played().is_empty());
    }

    #[tokio::test]
    async fn test_send_after_shutdown_errors() {
        let handle = Session::spawn(
            &Config::default(),
            Box::new(CollectorRenderer::new()),
            Box::new(CollectorSink::new()),
        );
        let events = handle.events.clone();
        handle.shutdown().await;

        let result = events.send(SessionEvent::GoToPage(0)).await;
        assert!(result.is_err());
    }
}
