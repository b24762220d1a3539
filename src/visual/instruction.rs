//! Draw instruction model.
//!
//! Instructions cross the bridge boundary as tagged JSON, already
//! classified by the upstream heuristic. Immutable once constructed;
//! each one is consumed exactly once by the renderer.

use serde::{Deserialize, Serialize};

/// A point on the drawing surface, in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A classified draw instruction from the AI collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualInstruction {
    /// Named shape with explicit vertices.
    ShapeDraw {
        shape: String,
        vertices: Vec<Point>,
        color: String,
    },
    /// Function graph sampled over a closed domain.
    GraphDraw {
        expression: String,
        domain: [f64; 2],
        color: String,
    },
    /// Free text or LaTeX, optionally positioned.
    TextDraw {
        content: String,
        #[serde(default)]
        position: Option<Point>,
        color: String,
    },
    /// Multi-step staged solution, revealed over time.
    SequenceAnimate { title: String, steps: Vec<String> },
}

impl VisualInstruction {
    /// Returns true for staged solutions, which bypass the sync scheduler.
    pub fn is_sequence(&self) -> bool {
        matches!(self, VisualInstruction::SequenceAnimate { .. })
    }

    /// Short kind name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            VisualInstruction::ShapeDraw { .. } => "shape",
            VisualInstruction::GraphDraw { .. } => "graph",
            VisualInstruction::TextDraw { .. } => "text",
            VisualInstruction::SequenceAnimate { .. } => "sequence",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tagged_json_shape() {
        let json = r##"{
            "kind": "shape_draw",
            "shape": "triangle",
            "vertices": [{"x": 0.0, "y": 0.0}, {"x": 1.0, "y": 0.0}, {"x": 0.5, "y": 1.0}],
            "color": "#ff0000"
        }"##;

        let instruction: VisualInstruction = serde_json::from_str(json).unwrap();
        match &instruction {
            VisualInstruction::ShapeDraw { shape, vertices, .. } => {
                assert_eq!(shape, "triangle");
                assert_eq!(vertices.len(), 3);
            }
            other => panic!("wrong variant: {:?}", other),
        }
        assert!(!instruction.is_sequence());
        assert_eq!(instruction.kind(), "shape");
    }

    #[test]
    fn test_tagged_json_graph() {
        let json = r#"{
            "kind": "graph_draw",
            "expression": "x * x",
            "domain": [-5.0, 5.0],
            "color": "blue"
        }"#;

        let instruction: VisualInstruction = serde_json::from_str(json).unwrap();
        match instruction {
            VisualInstruction::GraphDraw { domain, .. } => {
                assert_eq!(domain, [-5.0, 5.0]);
            }
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_text_position_is_optional() {
        let json = r#"{"kind": "text_draw", "content": "x = 4", "color": "white"}"#;

        let instruction: VisualInstruction = serde_json::from_str(json).unwrap();
        match instruction {
            VisualInstruction::TextDraw { position, .. } => assert!(position.is_none()),
            other => panic!("wrong variant: {:?}", other),
        }
    }

    #[test]
    fn test_sequence_is_sequence() {
        let instruction = VisualInstruction::SequenceAnimate {
            title: "Solve 2x + 5 = 13".to_string(),
            steps: vec!["Subtract 5".to_string(), "Divide by 2".to_string()],
        };
        assert!(instruction.is_sequence());
        assert_eq!(instruction.kind(), "sequence");
    }

    #[test]
    fn test_serde_roundtrip() {
        let instruction = VisualInstruction::TextDraw {
            content: "\\frac{1}{2}".to_string(),
            position: Some(Point::new(10.0, 20.0)),
            color: "green".to_string(),
        };
        let json = serde_json::to_string(&instruction).unwrap();
        let back: VisualInstruction = serde_json::from_str(&json).unwrap();
        assert_eq!(instruction, back);
    }
}
