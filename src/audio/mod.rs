//! Audio side of the whiteboard session.
//!
//! Chunks of vendor PCM arrive over the bridge, get decoded, and are laid
//! out gaplessly on a playback timeline:
//!
//! ```text
//! ┌────────────┐    ┌──────────┐    ┌───────────────┐    ┌───────────┐
//! │  Bridge    │───▶│  Decode  │───▶│ AudioTimeline │───▶│ AudioSink │
//! │  (chunks)  │    │ (PCM LE) │    │ (gapless lay- │    │ (host)    │
//! └────────────┘    └──────────┘    │  out + resync)│    └───────────┘
//!                                   └───────┬───────┘
//!                                           ▼
//!                                 signals visual queue flush
//! ```

pub mod chunk;
pub mod sink;
pub mod timeline;

pub use chunk::AudioChunk;
pub use sink::{AudioSink, CollectorSink, NullSink, PlayedChunk};
pub use timeline::{AudioTimeline, ScheduledChunk};
