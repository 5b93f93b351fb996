//! Marking the faces a cut leaves on the cutting plane.

use cutview_ir::{NodeId, Shape};
use cutview_kernel::Kernel;
use cutview_math::{Placement, Tolerance};

use crate::config::Style;
use crate::error::Result;
use crate::host::Host;

/// For each face of `shape`, whether it lies on `plane`.
///
/// A face qualifies when its normal matches the plane normal (the negated
/// normal when `reversed`) and its distance to the plane is within
/// [`Tolerance::COPLANAR`].
pub fn coplanar_faces<K: Kernel + ?Sized>(
    kernel: &K,
    shape: &Shape,
    plane: &Placement,
    reversed: bool,
) -> Vec<bool> {
    let tol = Tolerance::COPLANAR;
    let mut target = plane.normal().into_inner();
    if reversed {
        target = -target;
    }
    (0..shape.face_count())
        .map(|i| {
            let aligned = kernel
                .face_normal(shape, i)
                .is_some_and(|n| tol.aligned(&n, &target));
            aligned
                && kernel
                    .face_plane_distance(shape, i, plane)
                    .is_some_and(|d| tol.is_zero(d))
        })
        .collect()
}

/// Recolor the faces of `result` lying on `plane` with the marker color.
///
/// The per-face color list is reset to the base color first if its length
/// does not match the face count. Returns the number of faces marked.
pub fn paint_coplanar_faces<H: Host + ?Sized>(
    host: &mut H,
    result: NodeId,
    plane: &Placement,
    reversed: bool,
    style: &Style,
) -> Result<usize> {
    let Some(shape) = host.document().shape(result).cloned() else {
        log::debug!("{} has no shape to paint", result);
        return Ok(0);
    };
    let marked = coplanar_faces(host.kernel(), &shape, plane, reversed);
    let count = marked.len();

    let view = &mut host.document_mut().get_mut(result)?.view;
    if view.face_colors.len() != count {
        view.face_colors = vec![style.base_color; count];
    }
    let mut painted = 0;
    for (color, on_plane) in view.face_colors.iter_mut().zip(marked) {
        if on_plane {
            *color = style.cut_face_color;
            painted += 1;
        }
    }

    log::debug!("painted {} of {} face(s) of {}", painted, count, result);
    Ok(painted)
}
