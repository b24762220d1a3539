//! Visual side of the whiteboard session.
//!
//! Instructions arrive already classified from the bridge and take one of
//! two paths:
//!
//! ```text
//! ┌──────────────┐   simple    ┌─────────────┐   delay    ┌──────────┐
//! │ Instruction  │────────────▶│ VisualQueue │───────────▶│ Renderer │
//! │  (bridge)    │             │  (buckets)  │  (timer)   │  (host)  │
//! └──────┬───────┘             └─────────────┘            └──────────┘
//!        │ SequenceAnimate
//!        ▼
//! ┌──────────────────┐  paged, timed reveals
//! │ RevealController │─────────────────────▶ UI pagination state
//! └──────────────────┘
//! ```
//!
//! Both paths are self-paced approximations; exact audio sync is neither
//! available from the vendor nor promised to the viewer.

pub mod instruction;
pub mod queue;
pub mod reveal;

pub use instruction::{Point, VisualInstruction};
pub use queue::{QueuedVisual, ScheduledVisual, VisualQueue};
pub use reveal::{RevealController, RevealSchedule, RevealSnapshot, RevealTask, Step};
