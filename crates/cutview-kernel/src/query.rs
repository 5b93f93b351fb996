//! Measurements on shapes.

use cutview_ir::{Face, Shape};
use cutview_math::{Placement, Point3, Vec3};

/// Area vector of a planar polygon: normal times area, following winding.
pub fn area_vector(face: &Face) -> Vec3 {
    let n = face.vertices.len();
    if n < 3 {
        return Vec3::zeros();
    }
    let origin = face.vertices[0].coords;
    (1..n - 1)
        .map(|i| {
            let a = face.vertices[i].coords - origin;
            let b = face.vertices[i + 1].coords - origin;
            a.cross(&b)
        })
        .sum::<Vec3>()
        / 2.0
}

/// Enclosed volume, summed over cells.
///
/// Uses the divergence theorem, so it assumes closed cells with outward
/// winding.
pub fn volume(shape: &Shape) -> f64 {
    shape
        .faces()
        .filter(|f| !f.vertices.is_empty())
        .map(|f| f.vertices[0].coords.dot(&area_vector(f)))
        .sum::<f64>()
        / 3.0
}

/// Axis-aligned bounds as `(min, max)`, `None` for an empty shape.
pub fn bounds(shape: &Shape) -> Option<(Point3, Point3)> {
    let mut points = shape.faces().flat_map(|f| f.vertices.iter());
    let first = *points.next()?;
    Some(points.fold((first, first), |(lo, hi), p| {
        (lo.inf(p), hi.sup(p))
    }))
}

/// Outward normal of the face at a flat index.
pub fn face_normal(shape: &Shape, index: usize) -> Option<Vec3> {
    shape.face(index).map(|f| f.normal)
}

/// Signed distance from a plane to the face at a flat index, measured at
/// the face centroid along the plane normal.
pub fn face_plane_distance(shape: &Shape, index: usize, plane: &Placement) -> Option<f64> {
    shape
        .face(index)
        .map(|f| plane.signed_distance(&f.centroid()))
}
