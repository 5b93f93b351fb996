//! Extrude operation: create a prism by sweeping a profile along its normal.

use cutview_ir::{Cell, Face, Shape};
use cutview_math::{Point3, Vec3};

use crate::{KernelError, SketchProfile};

/// Extrude a closed convex profile along the sketch normal.
///
/// With `symmetric` set the prism spans `-length/2..length/2` around the
/// sketch plane, otherwise `0..length`. A negative length extrudes against
/// the normal.
///
/// The resulting cell has one lateral face per profile edge, in profile
/// order, followed by the bottom cap (facing away from the sweep) and the
/// top cap.
///
/// # Errors
///
/// - [`KernelError::ZeroExtrusion`] if `length` is zero or not finite
/// - [`KernelError::NonConvexProfile`] if the profile has a reflex corner
pub fn extrude(profile: &SketchProfile, length: f64, symmetric: bool) -> Result<Shape, KernelError> {
    if !length.is_finite() || length.abs() < 1e-12 {
        return Err(KernelError::ZeroExtrusion);
    }
    if !profile.is_convex() {
        return Err(KernelError::NonConvexProfile);
    }

    let (a, b) = if symmetric {
        (-length / 2.0, length / 2.0)
    } else {
        (0.0, length)
    };
    let (lo, hi) = (a.min(b), a.max(b));

    let normal = profile.normal();
    let base = profile.vertices_3d();
    let bottom: Vec<Point3> = base.iter().map(|p| p + normal * lo).collect();
    let top: Vec<Point3> = base.iter().map(|p| p + normal * hi).collect();

    let n = base.len();
    let mut faces = Vec::with_capacity(n + 2);

    // Profile runs CCW seen from +normal, so edge x normal points outward.
    // Winding: bot[i] -> bot[i+1] -> top[i+1] -> top[i]
    for i in 0..n {
        let j = (i + 1) % n;
        let edge: Vec3 = base[j] - base[i];
        faces.push(Face::new(
            vec![bottom[i], bottom[j], top[j], top[i]],
            edge.cross(&normal),
        ));
    }

    let mut bottom_cap = bottom;
    bottom_cap.reverse();
    faces.push(Face::new(bottom_cap, -normal));
    faces.push(Face::new(top, normal));

    log::trace!("extruded {}-gon over {:.3}..{:.3}", n, lo, hi);
    Ok(Shape {
        cells: vec![Cell { faces }],
    })
}
