//! Boolean subtraction on convex-cell shapes.
//!
//! Each tool cell is removed from each base cell by half-space
//! decomposition: for every face plane of the tool, the part of the
//! remaining base cell outside that plane is kept as a result cell and
//! clipping continues with the part inside. Whatever is left after the
//! last plane lies inside the tool and is dropped.

use cutview_ir::{Cell, Face, Shape};
use cutview_math::{Point3, Tolerance, Vec3};

/// Vertex lies on the plane.
pub const COPLANAR: u8 = 0;
/// Vertex lies on the side the normal points to.
pub const FRONT: u8 = 1;
/// Vertex lies behind the plane.
pub const BACK: u8 = 2;
/// Polygon has vertices on both sides.
pub const SPANNING: u8 = 3;

/// Oriented plane `normal . x = offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Unit normal.
    pub normal: Vec3,
    /// Distance from the origin along the normal.
    pub offset: f64,
}

impl Plane {
    /// Supporting plane of a face.
    pub fn of_face(face: &Face) -> Option<Self> {
        let p = face.vertices.first()?;
        Some(Self {
            normal: face.normal,
            offset: face.normal.dot(&p.coords),
        })
    }

    /// Signed distance of a point.
    pub fn distance(&self, p: &Point3) -> f64 {
        self.normal.dot(&p.coords) - self.offset
    }

    /// FRONT, BACK or COPLANAR within `eps`.
    pub fn orient_point(&self, p: &Point3, eps: f64) -> u8 {
        let d = self.distance(p);
        if d > eps {
            FRONT
        } else if d < -eps {
            BACK
        } else {
            COPLANAR
        }
    }
}

/// Polygon halves produced by one plane.
struct SplitPolygon {
    front: Vec<Point3>,
    back: Vec<Point3>,
    /// Points of the polygon lying on the plane, in polygon order.
    on_plane: Vec<Point3>,
}

fn split_polygon(vertices: &[Point3], plane: &Plane, eps: f64) -> SplitPolygon {
    let types: Vec<u8> = vertices
        .iter()
        .map(|v| plane.orient_point(v, eps))
        .collect();
    let mut out = SplitPolygon {
        front: Vec::new(),
        back: Vec::new(),
        on_plane: Vec::new(),
    };
    let n = vertices.len();
    for i in 0..n {
        let j = (i + 1) % n;
        let (ti, tj) = (types[i], types[j]);
        let (vi, vj) = (vertices[i], vertices[j]);

        if ti != BACK {
            out.front.push(vi);
        }
        if ti != FRONT {
            out.back.push(vi);
        }
        if ti == COPLANAR {
            out.on_plane.push(vi);
        }
        if (ti | tj) == SPANNING {
            let denom = plane.normal.dot(&(vj - vi));
            if denom.abs() > f64::EPSILON {
                let t = (plane.offset - plane.normal.dot(&vi.coords)) / denom;
                let v = vi + (vj - vi) * t;
                out.front.push(v);
                out.back.push(v);
                out.on_plane.push(v);
            }
        }
    }
    out
}

/// Order points on a plane counter-clockwise seen from `normal`,
/// dropping duplicates.
fn cap_polygon(points: &[Point3], normal: Vec3, eps: f64) -> Vec<Point3> {
    let mut unique: Vec<Point3> = Vec::new();
    for p in points {
        if !unique.iter().any(|q| (q - p).norm() <= eps) {
            unique.push(*p);
        }
    }
    if unique.len() < 3 {
        return Vec::new();
    }
    let centroid = Point3::from(
        unique.iter().fold(Vec3::zeros(), |acc, p| acc + p.coords) / unique.len() as f64,
    );

    let helper = if normal.x.abs() < 0.9 {
        Vec3::x()
    } else {
        Vec3::y()
    };
    let u = normal.cross(&helper).normalize();
    let v = normal.cross(&u);

    let mut keyed: Vec<(f64, Point3)> = unique
        .into_iter()
        .map(|p| {
            let d = p - centroid;
            (d.dot(&v).atan2(d.dot(&u)), p)
        })
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
    keyed.into_iter().map(|(_, p)| p).collect()
}

/// Split a convex cell by a plane into the pieces in front and behind.
///
/// A piece is `None` when the cell does not extend to that side.
pub fn split_cell(cell: &Cell, plane: &Plane, tol: &Tolerance) -> (Option<Cell>, Option<Cell>) {
    let eps = tol.linear;
    let cell_type = cell
        .faces
        .iter()
        .flat_map(|f| f.vertices.iter())
        .fold(COPLANAR, |acc, v| acc | plane.orient_point(v, eps));

    match cell_type {
        SPANNING => {}
        BACK => return (None, Some(cell.clone())),
        // Entirely in front, or flat on the plane
        _ => return (Some(cell.clone()), None),
    }

    let mut front = Vec::new();
    let mut back = Vec::new();
    let mut section = Vec::new();
    for face in &cell.faces {
        let split = split_polygon(&face.vertices, plane, eps);
        section.extend(split.on_plane);
        if split.front.len() >= 3 {
            front.push(Face {
                vertices: split.front,
                normal: face.normal,
            });
        }
        if split.back.len() >= 3 {
            back.push(Face {
                vertices: split.back,
                normal: face.normal,
            });
        }
    }

    let front_cap = cap_polygon(&section, -plane.normal, eps);
    let back_cap = cap_polygon(&section, plane.normal, eps);
    if front_cap.len() >= 3 {
        front.push(Face::new(front_cap, -plane.normal));
    }
    if back_cap.len() >= 3 {
        back.push(Face::new(back_cap, plane.normal));
    }

    let piece = |faces: Vec<Face>| (faces.len() >= 4).then_some(Cell { faces });
    (piece(front), piece(back))
}

/// True if every vertex of `cell` is on or in front of some face plane of
/// `tool`, so the two cannot overlap.
fn separated(cell: &Cell, tool: &Cell, eps: f64) -> bool {
    tool.faces.iter().filter_map(Plane::of_face).any(|plane| {
        cell.faces
            .iter()
            .flat_map(|f| f.vertices.iter())
            .all(|v| plane.orient_point(v, eps) != BACK)
    })
}

/// Remove a convex tool cell from a convex cell.
pub fn subtract_cell(cell: &Cell, tool: &Cell, tol: &Tolerance) -> Vec<Cell> {
    if separated(cell, tool, tol.linear) {
        return vec![cell.clone()];
    }
    let mut kept = Vec::new();
    let mut remainder = cell.clone();
    for plane in tool.faces.iter().filter_map(Plane::of_face) {
        let (outside, inside) = split_cell(&remainder, &plane, tol);
        kept.extend(outside);
        match inside {
            Some(rest) => remainder = rest,
            None => return kept,
        }
    }
    kept
}

/// `base - tool`.
pub fn subtract(base: &Shape, tool: &Shape, tol: &Tolerance) -> Shape {
    let mut cells = base.cells.clone();
    for tool_cell in &tool.cells {
        cells = cells
            .iter()
            .flat_map(|c| subtract_cell(c, tool_cell, tol))
            .collect();
    }
    log::debug!(
        "subtract: {} base cell(s) - {} tool cell(s) -> {} cell(s)",
        base.cells.len(),
        tool.cells.len(),
        cells.len()
    );
    Shape { cells }
}
