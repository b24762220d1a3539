//! Numeric sampling of graph expressions.
//!
//! A graph instruction carries a textual function of `x`. The sampler
//! compiles it once, then evaluates it at a fixed number of points across
//! the domain. Samples that fail to evaluate, come back non-finite, or
//! exceed the magnitude bound are omitted, splitting the output into
//! disjoint polylines, so the canvas shows a gap instead of a distorted
//! spike.

use crate::config::GraphConfig;
use crate::error::{ChalkboardError, Result};
use crate::visual::instruction::Point;
use rhai::{Dynamic, Engine, Scope};
use tracing::debug;

/// A run of connected samples.
pub type Polyline = Vec<Point>;

/// Expression sampler with a reusable engine.
pub struct GraphSampler {
    engine: Engine,
    config: GraphConfig,
}

impl GraphSampler {
    /// Creates a sampler with the given sampling configuration.
    pub fn new(config: GraphConfig) -> Self {
        Self {
            engine: Engine::new(),
            config,
        }
    }

    /// Samples `expression` over the closed domain `[start, end]`.
    ///
    /// Returns the connected runs of valid samples. An unparseable
    /// expression or an empty/inverted domain is an error the caller
    /// recovers from by drawing nothing; per-sample evaluation failures
    /// only produce gaps.
    pub fn sample(&self, expression: &str, domain: (f64, f64)) -> Result<Vec<Polyline>> {
        let (start, end) = domain;
        if end <= start || !start.is_finite() || !end.is_finite() {
            return Err(ChalkboardError::GraphDomain { start, end });
        }

        let ast = self.engine.compile_expression(expression).map_err(|e| {
            ChalkboardError::ExpressionParse {
                expression: expression.to_string(),
                message: e.to_string(),
            }
        })?;

        let samples = self.config.samples.max(2);
        let step = (end - start) / (samples - 1) as f64;
        let bound = self.config.magnitude_bound;

        let mut polylines = Vec::new();
        let mut current = Polyline::new();
        let mut omitted = 0usize;

        for i in 0..samples {
            let x = start + step * i as f64;
            let mut scope = Scope::new();
            scope.push("x", x);

            let value = self
                .engine
                .eval_ast_with_scope::<Dynamic>(&mut scope, &ast)
                .ok()
                .and_then(|d| coerce_float(&d));

            match value {
                Some(y) if y.is_finite() && y.abs() <= bound => {
                    current.push(Point::new(x, y));
                }
                _ => {
                    // Gap: close the current run, omit the point
                    omitted += 1;
                    if !current.is_empty() {
                        polylines.push(std::mem::take(&mut current));
                    }
                }
            }
        }
        if !current.is_empty() {
            polylines.push(current);
        }

        if omitted > 0 {
            debug!(expression, omitted, "omitted unplottable graph samples");
        }

        Ok(polylines)
    }
}

/// Coerces a rhai result to f64; integer-valued expressions are fine.
fn coerce_float(value: &Dynamic) -> Option<f64> {
    value
        .clone()
        .as_float()
        .ok()
        .or_else(|| value.clone().as_int().ok().map(|i| i as f64))
}
