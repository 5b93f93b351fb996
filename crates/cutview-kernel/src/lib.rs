#![warn(missing_docs)]

//! Polyhedral geometry kernel for the cutview tooling.
//!
//! Shapes are unions of convex cells with planar faces, which is all the
//! cut-view workflow needs: constrained rectangular sketches, symmetric
//! pads, subtraction of a box from arbitrary solids, and face queries
//! against a plane.
//!
//! # Example
//!
//! ```
//! use cutview_ir::Shape;
//! use cutview_kernel::{query, Kernel, PolyKernel};
//! use cutview_math::Point3;
//!
//! let kernel = PolyKernel::default();
//! let base = Shape::cuboid(Point3::origin(), Point3::new(10.0, 10.0, 10.0));
//! let tool = Shape::cuboid(Point3::new(-1.0, -1.0, 5.0), Point3::new(11.0, 11.0, 11.0));
//! let cut = kernel.subtract(&base, &tool).unwrap();
//! assert!((query::volume(&cut) - 500.0).abs() < 1e-9);
//! ```

pub mod boolean;
pub mod constraints;
mod extrude;
mod profile;
pub mod query;
mod recompute;

pub use extrude::extrude;
pub use profile::SketchProfile;
pub use recompute::{recompute, RecomputeReport};

use cutview_ir::{IrError, NodeId, Shape, Sketch};
use cutview_math::{Placement, Tolerance, Vec3};
use thiserror::Error;

/// Errors from kernel operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum KernelError {
    /// The profile has no usable segments.
    #[error("profile has no segments")]
    EmptyProfile,

    /// The profile is not closed (gap between consecutive segments).
    #[error("profile is not closed: gap of {0:.6} mm")]
    NotClosed(f64),

    /// A segment is degenerate (zero length).
    #[error("degenerate segment at index {0}")]
    DegenerateSegment(usize),

    /// Only convex profiles can be extruded.
    #[error("profile is not convex")]
    NonConvexProfile,

    /// Extrusion length is zero.
    #[error("extrusion length is zero")]
    ZeroExtrusion,

    /// A constraint refers to a line the sketch does not have.
    #[error("constraint {0} refers to a missing line")]
    BadReference(usize),

    /// Sketch geometry violates a constraint.
    #[error("constraint {constraint} is violated by {residual:.6}")]
    Unsatisfied {
        /// Constraint index.
        constraint: usize,
        /// Distance from satisfaction.
        residual: f64,
    },

    /// The sketch still has free degrees of freedom.
    #[error("sketch is under-constrained: {0} degree(s) of freedom left")]
    UnderConstrained(i64),

    /// The sketch has redundant constraints.
    #[error("sketch is over-constrained by {0}")]
    OverConstrained(i64),

    /// A pad refers to a node that is not a sketch.
    #[error("node {0} is not a sketch")]
    MissingSketch(NodeId),

    /// A boolean operand has no shape.
    #[error("node {0} has no shape")]
    MissingShape(NodeId),

    /// Document graph error.
    #[error(transparent)]
    Document(#[from] IrError),
}

/// Geometry operations the cut-view workflow relies on.
///
/// The document layer only talks to this trait, so tests can swap in a
/// kernel that fails on purpose.
pub trait Kernel {
    /// Verify a sketch is fully constrained and satisfied.
    fn check_sketch(&self, sketch: &Sketch) -> Result<(), KernelError>;

    /// Closed profile from a sketch.
    fn profile(&self, sketch: &Sketch) -> Result<SketchProfile, KernelError>;

    /// Prism from a profile.
    fn extrude(
        &self,
        profile: &SketchProfile,
        length: f64,
        symmetric: bool,
    ) -> Result<Shape, KernelError>;

    /// `base - tool`.
    fn subtract(&self, base: &Shape, tool: &Shape) -> Result<Shape, KernelError>;

    /// Outward normal of a face.
    fn face_normal(&self, shape: &Shape, index: usize) -> Option<Vec3> {
        query::face_normal(shape, index)
    }

    /// Signed distance from a plane to a face.
    fn face_plane_distance(&self, shape: &Shape, index: usize, plane: &Placement) -> Option<f64> {
        query::face_plane_distance(shape, index, plane)
    }
}

/// The convex-cell kernel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolyKernel {
    /// Tolerances for classification and constraint checks.
    pub tolerance: Tolerance,
}

impl Default for PolyKernel {
    fn default() -> Self {
        Self {
            tolerance: Tolerance::DEFAULT,
        }
    }
}

impl Kernel for PolyKernel {
    fn check_sketch(&self, sketch: &Sketch) -> Result<(), KernelError> {
        constraints::check_sketch(sketch, &self.tolerance)
    }

    fn profile(&self, sketch: &Sketch) -> Result<SketchProfile, KernelError> {
        SketchProfile::from_sketch(sketch)
    }

    fn extrude(
        &self,
        profile: &SketchProfile,
        length: f64,
        symmetric: bool,
    ) -> Result<Shape, KernelError> {
        extrude::extrude(profile, length, symmetric)
    }

    fn subtract(&self, base: &Shape, tool: &Shape) -> Result<Shape, KernelError> {
        Ok(boolean::subtract(base, tool, &self.tolerance))
    }
}
