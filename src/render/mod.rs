//! Renderer port.
//!
//! The host (canvas shell, test harness) supplies the actual drawing
//! surface; the core only hands it realized instructions. Realizing is the
//! single path that mutates the visible scene for non-sequence visuals.

pub mod graph;

use crate::config::GraphConfig;
use crate::visual::instruction::VisualInstruction;
use graph::GraphSampler;
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Pluggable drawing surface handler.
///
/// Contract: each call clears the prior non-sequence scene before drawing,
/// so the surface holds exactly one scene at a time. Staged-solution pages
/// persist as an overlay until replaced. Calls are idempotent.
pub trait Renderer: Send + 'static {
    /// Realize one instruction against the display.
    fn realize(&mut self, instruction: &VisualInstruction);

    /// Name for logging/debugging.
    fn name(&self) -> &'static str {
        "renderer"
    }
}

/// Records realized instructions for inspection (library and test use).
///
/// Clones share the same record list, so a clone kept by the caller sees
/// everything the session-owned renderer received.
#[derive(Clone, Default)]
pub struct CollectorRenderer {
    realized: Arc<Mutex<Vec<VisualInstruction>>>,
}

impl CollectorRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything realized so far, in order.
    pub fn realized(&self) -> Vec<VisualInstruction> {
        match self.realized.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Renderer for CollectorRenderer {
    fn realize(&mut self, instruction: &VisualInstruction) {
        match self.realized.lock() {
            Ok(mut guard) => guard.push(instruction.clone()),
            Err(poisoned) => poisoned.into_inner().push(instruction.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "collector"
    }
}

/// Headless renderer that describes each scene on stdout (demo use).
///
/// Graphs are actually sampled so expression and domain problems surface
/// the same way they would on a real canvas: as a logged skip.
pub struct StdoutRenderer {
    sampler: GraphSampler,
}

impl StdoutRenderer {
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            sampler: GraphSampler::new(config.clone()),
        }
    }
}

impl Renderer for StdoutRenderer {
    fn realize(&mut self, instruction: &VisualInstruction) {
        match instruction {
            VisualInstruction::ShapeDraw {
                shape,
                vertices,
                color,
            } => {
                println!("[draw] {} ({} vertices, {})", shape, vertices.len(), color);
            }
            VisualInstruction::GraphDraw {
                expression,
                domain,
                color,
            } => match self.sampler.sample(expression, (domain[0], domain[1])) {
                Ok(polylines) => {
                    let points: usize = polylines.iter().map(|p| p.len()).sum();
                    println!(
                        "[draw] graph of '{}' over [{}, {}]: {} points in {} segment(s), {}",
                        expression,
                        domain[0],
                        domain[1],
                        points,
                        polylines.len(),
                        color
                    );
                }
                Err(e) => warn!(error = %e, "skipping graph instruction"),
            },
            VisualInstruction::TextDraw { content, .. } => {
                println!("[draw] text: {}", content);
            }
            VisualInstruction::SequenceAnimate { title, steps } => {
                info!(steps = steps.len(), "staged solution begins");
                println!("[board] {} ({} steps)", title, steps.len());
            }
        }
    }

    fn name(&self) -> &'static str {
        "stdout"
    }
}
