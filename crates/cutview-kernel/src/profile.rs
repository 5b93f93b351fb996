//! Closed polygon profiles built from sketch lines.

use cutview_ir::Sketch;
use cutview_math::{Placement, Point2, Point3, Tolerance, Vec3};

use crate::KernelError;

/// A closed polygon on a sketch plane.
///
/// Points are stored counter-clockwise when viewed from the placement's
/// +normal side, without repeating the first point.
#[derive(Debug, Clone, PartialEq)]
pub struct SketchProfile {
    /// Sketch plane frame.
    pub placement: Placement,
    /// Polygon corners in sketch coordinates.
    pub points: Vec<Point2>,
}

impl SketchProfile {
    /// Create a profile from polygon corners.
    ///
    /// Clockwise input is reversed.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are fewer than three corners
    /// - Two consecutive corners coincide
    pub fn new(placement: Placement, mut points: Vec<Point2>) -> Result<Self, KernelError> {
        if points.len() < 3 {
            return Err(KernelError::EmptyProfile);
        }
        let tol = Tolerance::DEFAULT;
        for i in 0..points.len() {
            let next = points[(i + 1) % points.len()];
            if (next - points[i]).norm() < tol.linear {
                return Err(KernelError::DegenerateSegment(i));
            }
        }
        if signed_area(&points) < 0.0 {
            points.reverse();
        }
        Ok(Self { placement, points })
    }

    /// Chain a sketch's lines into a profile.
    ///
    /// Lines must be stored head to tail, each starting where the previous
    /// one ends, and the last one must end where the first starts.
    pub fn from_sketch(sketch: &Sketch) -> Result<Self, KernelError> {
        let Some(first) = sketch.lines.first() else {
            return Err(KernelError::EmptyProfile);
        };
        let tol = Tolerance::DEFAULT;

        for (i, line) in sketch.lines.iter().enumerate() {
            if (line.end - line.start).norm() < tol.linear {
                return Err(KernelError::DegenerateSegment(i));
            }
        }
        for pair in sketch.lines.windows(2) {
            let gap = (pair[1].start - pair[0].end).norm();
            if gap > tol.linear {
                return Err(KernelError::NotClosed(gap));
            }
        }
        let last = sketch.lines[sketch.lines.len() - 1];
        let gap = (first.start - last.end).norm();
        if gap > tol.linear {
            return Err(KernelError::NotClosed(gap));
        }

        let points = sketch.lines.iter().map(|l| l.start).collect();
        Self::new(sketch.placement, points)
    }

    /// Map a 2D point in sketch coordinates to 3D.
    pub fn to_3d(&self, p: Point2) -> Point3 {
        self.placement.to_global(p)
    }

    /// Corners mapped to 3D.
    pub fn vertices_3d(&self) -> Vec<Point3> {
        self.points.iter().map(|p| self.to_3d(*p)).collect()
    }

    /// Unit normal of the sketch plane.
    pub fn normal(&self) -> Vec3 {
        self.placement.normal().into_inner()
    }

    /// True if every corner turns left.
    pub fn is_convex(&self) -> bool {
        let n = self.points.len();
        (0..n).all(|i| {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            let c = self.points[(i + 2) % n];
            let ab = b - a;
            let bc = c - b;
            ab.x * bc.y - ab.y * bc.x >= -Tolerance::DEFAULT.linear
        })
    }
}

/// Shoelace area, positive for counter-clockwise polygons.
fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| {
            let a = points[i];
            let b = points[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f64>()
        / 2.0
}
