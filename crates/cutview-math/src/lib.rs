#![warn(missing_docs)]

//! Math types for the cutview workspace.
//!
//! Thin wrappers around nalgebra providing the few domain types the
//! cut-view tooling needs: points, vectors, unit directions, plane
//! placements and tolerance constants.

use nalgebra::{Unit, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// A unit (normalized) direction vector in 3D space.
pub type Dir3 = Unit<Vector3<f64>>;

/// A point in a 2D sketch plane.
pub type Point2 = nalgebra::Point2<f64>;

/// A vector in 2D space.
pub type Vec2 = Vector2<f64>;

/// Position and orientation of a local frame.
///
/// Planes and sketches live in this frame: the local XY plane is the
/// plane surface and local +Z is its normal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    /// Origin of the local frame.
    pub origin: Point3,
    /// Rotation from global axes to local axes.
    pub rotation: UnitQuaternion<f64>,
}

impl Placement {
    /// Placement at the global origin with global axes.
    pub fn identity() -> Self {
        Self {
            origin: Point3::origin(),
            rotation: UnitQuaternion::identity(),
        }
    }

    /// Placement with the given origin and rotation.
    pub fn new(origin: Point3, rotation: UnitQuaternion<f64>) -> Self {
        Self { origin, rotation }
    }

    /// Placement whose local +Z is `normal`.
    ///
    /// The in-plane axes are the shortest rotation of the global X/Y axes
    /// onto the plane. A normal pointing along global -Z is a half turn
    /// about X.
    pub fn from_normal(origin: Point3, normal: Vec3) -> Self {
        let rotation = UnitQuaternion::rotation_between(&Vec3::z(), &normal).unwrap_or_else(|| {
            UnitQuaternion::from_axis_angle(&Vec3::x_axis(), std::f64::consts::PI)
        });
        Self { origin, rotation }
    }

    /// Local +Z axis in global coordinates.
    pub fn normal(&self) -> Dir3 {
        Dir3::new_normalize(self.rotation * Vec3::z())
    }

    /// Local +X axis in global coordinates.
    pub fn x_dir(&self) -> Dir3 {
        Dir3::new_normalize(self.rotation * Vec3::x())
    }

    /// Local +Y axis in global coordinates.
    pub fn y_dir(&self) -> Dir3 {
        Dir3::new_normalize(self.rotation * Vec3::y())
    }

    /// Map a point of the local XY plane to global coordinates.
    pub fn to_global(&self, p: Point2) -> Point3 {
        self.origin + p.x * self.x_dir().as_ref() + p.y * self.y_dir().as_ref()
    }

    /// Same placement moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            origin: self.origin + offset,
            rotation: self.rotation,
        }
    }

    /// Signed distance of `p` from the local XY plane, positive on the
    /// normal side.
    pub fn signed_distance(&self, p: &Point3) -> f64 {
        self.normal().dot(&(p - self.origin))
    }
}

impl Default for Placement {
    fn default() -> Self {
        Self::identity()
    }
}

/// Tolerance constants for geometric comparisons.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    /// Linear distance tolerance in model units.
    pub linear: f64,
    /// Allowed deviation of a unit-vector dot product from 1.
    pub alignment: f64,
}

impl Tolerance {
    /// Default tolerances (1e-6 linear, 1e-9 alignment).
    pub const DEFAULT: Self = Self {
        linear: 1e-6,
        alignment: 1e-9,
    };

    /// Tolerances used to decide that a face lies on a cutting plane.
    pub const COPLANAR: Self = Self {
        linear: 1e-6,
        alignment: 1e-6,
    };

    /// Check if two points are coincident within tolerance.
    pub fn points_equal(&self, a: &Point3, b: &Point3) -> bool {
        (a - b).norm() < self.linear
    }

    /// Check if a scalar distance is effectively zero.
    pub fn is_zero(&self, d: f64) -> bool {
        d.abs() <= self.linear
    }

    /// Check if two directions point the same way.
    ///
    /// Both inputs are normalized first; zero vectors never align.
    pub fn aligned(&self, a: &Vec3, b: &Vec3) -> bool {
        match (a.try_normalize(f64::EPSILON), b.try_normalize(f64::EPSILON)) {
            (Some(a), Some(b)) => (a.dot(&b) - 1.0).abs() <= self.alignment,
            _ => false,
        }
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_identity_placement_axes() {
        let p = Placement::identity();
        assert_relative_eq!(p.normal().into_inner(), Vec3::z(), epsilon = 1e-12);
        assert_relative_eq!(p.x_dir().into_inner(), Vec3::x(), epsilon = 1e-12);
        assert_relative_eq!(p.y_dir().into_inner(), Vec3::y(), epsilon = 1e-12);
    }

    #[test]
    fn test_from_normal() {
        let p = Placement::from_normal(Point3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 2.0, 0.0));
        assert_relative_eq!(p.normal().into_inner(), Vec3::y(), epsilon = 1e-12);
        // In-plane axes stay orthogonal to the normal
        assert!(p.x_dir().dot(p.normal().as_ref()).abs() < 1e-12);
        assert!(p.y_dir().dot(p.normal().as_ref()).abs() < 1e-12);
    }

    #[test]
    fn test_from_normal_opposite_z() {
        let p = Placement::from_normal(Point3::origin(), -Vec3::z());
        assert_relative_eq!(p.normal().into_inner(), -Vec3::z(), epsilon = 1e-12);
    }

    #[test]
    fn test_to_global() {
        let p = Placement::from_normal(Point3::new(0.0, 0.0, 5.0), Vec3::z());
        let g = p.to_global(Point2::new(1.0, 2.0));
        assert_relative_eq!(g, Point3::new(1.0, 2.0, 5.0), epsilon = 1e-12);
    }

    #[test]
    fn test_translated_and_signed_distance() {
        let p = Placement::from_normal(Point3::origin(), Vec3::x());
        let moved = p.translated(p.normal().into_inner() * 1e-4);
        assert_relative_eq!(moved.origin.x, 1e-4, epsilon = 1e-12);
        assert_relative_eq!(
            moved.signed_distance(&Point3::new(1.0, 7.0, -3.0)),
            1.0 - 1e-4,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_tolerance_points_equal() {
        let tol = Tolerance::DEFAULT;
        let a = Point3::new(1.0, 2.0, 3.0);
        let b = Point3::new(1.0 + 1e-7, 2.0, 3.0);
        assert!(tol.points_equal(&a, &b));
        let c = Point3::new(1.001, 2.0, 3.0);
        assert!(!tol.points_equal(&a, &c));
    }

    #[test]
    fn test_tolerance_aligned() {
        let tol = Tolerance::COPLANAR;
        assert!(tol.aligned(&Vec3::z(), &Vec3::new(0.0, 0.0, 3.0)));
        assert!(!tol.aligned(&Vec3::z(), &-Vec3::z()));
        assert!(!tol.aligned(&Vec3::z(), &Vec3::new(0.0, 0.01, 1.0)));
        assert!(!tol.aligned(&Vec3::zeros(), &Vec3::z()));
    }

    #[test]
    fn test_placement_serde() {
        let p = Placement::from_normal(Point3::new(1.0, 0.0, 0.0), Vec3::y());
        let json = serde_json::to_string(&p).unwrap();
        let restored: Placement = serde_json::from_str(&json).unwrap();
        assert_relative_eq!(restored.origin, p.origin, epsilon = 1e-12);
        assert_relative_eq!(
            restored.normal().into_inner(),
            p.normal().into_inner(),
            epsilon = 1e-12
        );
    }
}
