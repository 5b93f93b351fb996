//! Cut geometry: the cutting plane and the boxes subtracted from each
//! reference.

use std::fmt;
use std::str::FromStr;

use cutview_ir::{
    Constraint, Document, FeatureSource, NodeData, NodeId, Sketch, SketchLine, Vertex,
};
use cutview_math::{Placement, Point2};
use serde::{Deserialize, Serialize};

use crate::config::Style;
use crate::error::{CutviewError, Result};
use crate::host::Host;
use crate::label::{plane_label, Letter, Tag};

/// Distance the cutting plane is moved along its normal before boxes are
/// built on it.
pub const PLANE_NUDGE: f64 = 1e-4;

/// Supported box edge lengths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum BoxSize {
    /// 500
    S500,
    /// 1000
    #[default]
    S1000,
    /// 1500
    S1500,
    /// 2000
    S2000,
    /// 3000
    S3000,
    /// 4000
    S4000,
    /// 5000
    S5000,
}

impl BoxSize {
    /// Every size, smallest first.
    pub const ALL: [BoxSize; 7] = [
        BoxSize::S500,
        BoxSize::S1000,
        BoxSize::S1500,
        BoxSize::S2000,
        BoxSize::S3000,
        BoxSize::S4000,
        BoxSize::S5000,
    ];

    /// Edge length in document units.
    pub fn value(self) -> u32 {
        match self {
            BoxSize::S500 => 500,
            BoxSize::S1000 => 1000,
            BoxSize::S1500 => 1500,
            BoxSize::S2000 => 2000,
            BoxSize::S3000 => 3000,
            BoxSize::S4000 => 4000,
            BoxSize::S5000 => 5000,
        }
    }

    /// Edge length as a float.
    pub fn length(self) -> f64 {
        f64::from(self.value())
    }
}

impl TryFrom<u32> for BoxSize {
    type Error = CutviewError;

    fn try_from(value: u32) -> Result<Self> {
        BoxSize::ALL
            .into_iter()
            .find(|s| s.value() == value)
            .ok_or(CutviewError::InvalidBoxSize(value))
    }
}

impl From<BoxSize> for u32 {
    fn from(size: BoxSize) -> u32 {
        size.value()
    }
}

impl FromStr for BoxSize {
    type Err = CutviewError;

    fn from_str(s: &str) -> Result<Self> {
        let value = s
            .trim()
            .parse::<u32>()
            .map_err(|_| CutviewError::InvalidBoxSize(0))?;
        BoxSize::try_from(value)
    }
}

impl fmt::Display for BoxSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Relabel the cutting plane for `letter` and nudge it along its normal.
///
/// Call once per session; the nudge accumulates.
pub fn prepare_plane(doc: &mut Document, plane: NodeId, letter: Letter) -> Result<Placement> {
    let placement = doc.placement(plane)?;
    doc.set_label(plane, plane_label(letter))?;
    let nudged = placement.translated(placement.normal().into_inner() * PLANE_NUDGE);
    doc.set_placement(plane, nudged)?;
    log::debug!("plane {} relabeled and nudged by {}", plane, PLANE_NUDGE);
    Ok(nudged)
}

/// Square of side `size` centered on the sketch origin, with every degree
/// of freedom pinned: coincident corners, horizontal and vertical edges,
/// width and height, and corners symmetric about the origin.
pub fn box_sketch(placement: Placement, size: f64) -> Sketch {
    let h = size / 2.0;
    let corners = [
        Point2::new(-h, -h),
        Point2::new(h, -h),
        Point2::new(h, h),
        Point2::new(-h, h),
    ];
    let mut sketch = Sketch::new(placement);
    for i in 0..4 {
        sketch.add_line(SketchLine::new(corners[i], corners[(i + 1) % 4]));
    }
    for i in 0..4 {
        sketch.add_constraint(Constraint::Coincident {
            a: Vertex::end(i),
            b: Vertex::start((i + 1) % 4),
        });
    }
    sketch.add_constraint(Constraint::Horizontal { line: 0 });
    sketch.add_constraint(Constraint::Horizontal { line: 2 });
    sketch.add_constraint(Constraint::Vertical { line: 1 });
    sketch.add_constraint(Constraint::Vertical { line: 3 });
    sketch.add_constraint(Constraint::DistanceX {
        line: 0,
        value: size,
    });
    sketch.add_constraint(Constraint::DistanceY {
        line: 1,
        value: size,
    });
    sketch.add_constraint(Constraint::Symmetric {
        a: Vertex::start(0),
        b: Vertex::start(2),
    });
    sketch
}

/// Build the cut box for one tag: a hidden, non-selectable body holding a
/// constrained square sketch on the plane and a symmetric pad of `size`.
///
/// The sketch is checked and the pad evaluated before anything is added to
/// the document, so a kernel failure leaves no partial body behind.
pub fn build_cut_cube<H: Host + ?Sized>(
    host: &mut H,
    plane: Placement,
    tag: Tag,
    size: BoxSize,
    style: &Style,
) -> Result<NodeId> {
    let label = tag.cube_label();
    let length = size.length();
    let sketch = box_sketch(plane, length);

    let kernel = host.kernel();
    let shape = kernel
        .check_sketch(&sketch)
        .and_then(|_| kernel.profile(&sketch))
        .and_then(|profile| kernel.extrude(&profile, length, true))
        .map_err(|source| CutviewError::GeometryConstruction {
            label: label.clone(),
            source,
        })?;

    let doc = host.document_mut();
    let body = doc.add(label.clone(), NodeData::body(shape.clone()));
    let sketch_id = doc.add_child(body, format!("{tag}_Sketch"), NodeData::Sketch(sketch))?;
    let pad = doc.add_child(
        body,
        format!("{tag}_Pad"),
        NodeData::Feature {
            shape,
            source: FeatureSource::Pad {
                sketch: sketch_id,
                length,
                symmetric: true,
            },
        },
    )?;
    if let NodeData::Body { tip, .. } = &mut doc.get_mut(body)?.data {
        *tip = Some(pad);
    }

    let view = &mut doc.get_mut(body)?.view;
    view.visible = false;
    view.selectable = false;
    view.color = style.cube_color;
    view.transparency = style.cube_transparency;

    log::debug!("built {} ({})", label, body);
    Ok(body)
}
