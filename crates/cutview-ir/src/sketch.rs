//! Declarative sketch data: line geometry plus geometric constraints.
//!
//! Sketches are stored as-is; checking that the constraints hold and
//! turning the lines into a closed profile is the kernel's job.

use cutview_math::{Placement, Point2};
use serde::{Deserialize, Serialize};

/// A straight line in sketch coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SketchLine {
    /// Start point.
    pub start: Point2,
    /// End point.
    pub end: Point2,
}

impl SketchLine {
    /// Create a line from `start` to `end`.
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }
}

/// Which end of a line a constraint refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineEnd {
    /// The line's start point.
    Start,
    /// The line's end point.
    End,
}

/// A line endpoint, addressed by line index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vertex {
    /// Index into [`Sketch::lines`].
    pub line: usize,
    /// Which endpoint.
    pub end: LineEnd,
}

impl Vertex {
    /// Start point of `line`.
    pub fn start(line: usize) -> Self {
        Self {
            line,
            end: LineEnd::Start,
        }
    }

    /// End point of `line`.
    pub fn end(line: usize) -> Self {
        Self {
            line,
            end: LineEnd::End,
        }
    }
}

/// Geometric constraint between sketch elements.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Constraint {
    /// Two endpoints share a position.
    Coincident {
        /// First endpoint.
        a: Vertex,
        /// Second endpoint.
        b: Vertex,
    },
    /// A line is parallel to the sketch X axis.
    Horizontal {
        /// Line index.
        line: usize,
    },
    /// A line is parallel to the sketch Y axis.
    Vertical {
        /// Line index.
        line: usize,
    },
    /// Absolute X extent of a line.
    DistanceX {
        /// Line index.
        line: usize,
        /// Required extent.
        value: f64,
    },
    /// Absolute Y extent of a line.
    DistanceY {
        /// Line index.
        line: usize,
        /// Required extent.
        value: f64,
    },
    /// Two endpoints mirror each other through the sketch origin.
    Symmetric {
        /// First endpoint.
        a: Vertex,
        /// Second endpoint.
        b: Vertex,
    },
}

/// A planar sketch attached to a placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sketch {
    /// Attachment: the sketch plane is the placement's local XY plane.
    pub placement: Placement,
    /// Line geometry.
    pub lines: Vec<SketchLine>,
    /// Constraints over the lines.
    pub constraints: Vec<Constraint>,
}

impl Sketch {
    /// Empty sketch attached to `placement`.
    pub fn new(placement: Placement) -> Self {
        Self {
            placement,
            lines: Vec::new(),
            constraints: Vec::new(),
        }
    }

    /// Append a line, returning its index.
    pub fn add_line(&mut self, line: SketchLine) -> usize {
        self.lines.push(line);
        self.lines.len() - 1
    }

    /// Append a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Position of an endpoint, if the line exists.
    pub fn point(&self, v: Vertex) -> Option<Point2> {
        self.lines.get(v.line).map(|l| match v.end {
            LineEnd::Start => l.start,
            LineEnd::End => l.end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_lookup() {
        let mut sk = Sketch::new(Placement::identity());
        let l = sk.add_line(SketchLine::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0)));
        assert_eq!(sk.point(Vertex::end(l)), Some(Point2::new(2.0, 0.0)));
        assert_eq!(sk.point(Vertex::start(l)), Some(Point2::new(0.0, 0.0)));
        assert_eq!(sk.point(Vertex::start(7)), None);
    }

    #[test]
    fn constraint_serde_tagged() {
        let c = Constraint::DistanceX {
            line: 0,
            value: 1000.0,
        };
        let json = serde_json::to_string(&c).unwrap();
        assert!(json.contains(r#""type":"DistanceX""#));
        let restored: Constraint = serde_json::from_str(&json).unwrap();
        assert_eq!(c, restored);
    }
}
