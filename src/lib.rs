//! chalkboard - Audio/visual synchronization core for a realtime AI whiteboard
//!
//! Takes the asynchronously-arriving halves of an AI tutoring response
//! (narration audio chunks and classified draw instructions) and produces
//! a plausible temporal alignment between them, plus paginated, timed
//! reveals for multi-step solutions.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod audio;
pub mod config;
pub mod defaults;
pub mod error;
pub mod render;
pub mod session;
pub mod visual;

// Core ports (the host supplies both ends)
pub use audio::sink::{AudioSink, CollectorSink, NullSink};
pub use render::{CollectorRenderer, Renderer, StdoutRenderer};

// Session
pub use session::{ConnectionStatus, Session, SessionEvent, SessionHandle};

// Data model
pub use audio::chunk::AudioChunk;
pub use visual::instruction::{Point, VisualInstruction};
pub use visual::reveal::RevealSnapshot;

// Error handling
pub use error::{ChalkboardError, Result};

// Config
pub use config::Config;
