//! Constraint checking for sketches.
//!
//! Sketches carry their solved geometry. This module verifies that the
//! geometry satisfies every constraint and that the constraint set pins
//! the geometry down exactly: no free degrees of freedom and no redundant
//! constraints.

use cutview_ir::{Constraint, Sketch, Vertex};
use cutview_math::{Point2, Tolerance};

use crate::KernelError;

/// Degrees of freedom of a free line: two endpoints in the plane.
const LINE_DOF: i64 = 4;

/// Degrees of freedom a constraint removes.
pub fn removed_dof(constraint: &Constraint) -> i64 {
    match constraint {
        Constraint::Coincident { .. } | Constraint::Symmetric { .. } => 2,
        Constraint::Horizontal { .. }
        | Constraint::Vertical { .. }
        | Constraint::DistanceX { .. }
        | Constraint::DistanceY { .. } => 1,
    }
}

/// Remaining degrees of freedom. Negative means over-constrained.
pub fn degrees_of_freedom(sketch: &Sketch) -> i64 {
    let free = sketch.lines.len() as i64 * LINE_DOF;
    let removed: i64 = sketch.constraints.iter().map(removed_dof).sum();
    free - removed
}

/// How far the sketch geometry is from satisfying `constraint`.
pub fn residual(sketch: &Sketch, index: usize) -> Result<f64, KernelError> {
    let constraint = sketch
        .constraints
        .get(index)
        .ok_or(KernelError::BadReference(index))?;
    let point = |v: Vertex| sketch.point(v).ok_or(KernelError::BadReference(index));
    let line = |l: usize| {
        sketch
            .lines
            .get(l)
            .map(|line| line.end - line.start)
            .ok_or(KernelError::BadReference(index))
    };

    let r = match *constraint {
        Constraint::Coincident { a, b } => (point(a)? - point(b)?).norm(),
        Constraint::Horizontal { line: l } => line(l)?.y.abs(),
        Constraint::Vertical { line: l } => line(l)?.x.abs(),
        Constraint::DistanceX { line: l, value } => (line(l)?.x.abs() - value).abs(),
        Constraint::DistanceY { line: l, value } => (line(l)?.y.abs() - value).abs(),
        Constraint::Symmetric { a, b } => {
            let mid = Point2::from((point(a)?.coords + point(b)?.coords) / 2.0);
            mid.coords.norm()
        }
    };
    Ok(r)
}

/// Check that a sketch is fully constrained and its geometry satisfies
/// every constraint.
///
/// # Errors
///
/// - [`KernelError::BadReference`] if a constraint names a missing line
/// - [`KernelError::Unsatisfied`] for the first violated constraint
/// - [`KernelError::UnderConstrained`] / [`KernelError::OverConstrained`]
///   when the degree-of-freedom count is not zero
pub fn check_sketch(sketch: &Sketch, tol: &Tolerance) -> Result<(), KernelError> {
    for index in 0..sketch.constraints.len() {
        let r = residual(sketch, index)?;
        if r > tol.linear {
            return Err(KernelError::Unsatisfied {
                constraint: index,
                residual: r,
            });
        }
    }

    match degrees_of_freedom(sketch) {
        0 => Ok(()),
        dof if dof > 0 => Err(KernelError::UnderConstrained(dof)),
        dof => Err(KernelError::OverConstrained(-dof)),
    }
}
