//! Stored solid geometry.
//!
//! A [`Shape`] is a list of convex polyhedral cells. Each cell is bounded by
//! planar polygon faces with outward normals. Faces are addressed by a flat
//! index running through the cells in order, which is how per-face colors
//! line up with geometry.

use cutview_math::{Point3, Vec3};
use serde::{Deserialize, Serialize};

/// A planar polygon face with an outward normal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Face {
    /// Polygon vertices, counter-clockwise seen from outside.
    pub vertices: Vec<Point3>,
    /// Outward unit normal.
    pub normal: Vec3,
}

impl Face {
    /// Create a face, normalizing `normal`.
    pub fn new(vertices: Vec<Point3>, normal: Vec3) -> Self {
        let normal = normal.try_normalize(f64::EPSILON).unwrap_or(normal);
        Self { vertices, normal }
    }

    /// Vertex average, the center of the face's parameter range.
    pub fn centroid(&self) -> Point3 {
        if self.vertices.is_empty() {
            return Point3::origin();
        }
        let sum = self
            .vertices
            .iter()
            .fold(Vec3::zeros(), |acc, p| acc + p.coords);
        Point3::from(sum / self.vertices.len() as f64)
    }
}

/// A convex polyhedron.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Boundary faces.
    pub faces: Vec<Face>,
}

/// Solid geometry attached to a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Convex cells making up the solid.
    pub cells: Vec<Cell>,
}

impl Shape {
    /// A shape with no geometry.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Axis-aligned box spanning `min`..`max`.
    pub fn cuboid(min: Point3, max: Point3) -> Self {
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        let p = |x, y, z| Point3::new(x, y, z);

        let faces = vec![
            Face::new(
                vec![p(x0, y0, z0), p(x0, y0, z1), p(x0, y1, z1), p(x0, y1, z0)],
                -Vec3::x(),
            ),
            Face::new(
                vec![p(x1, y0, z0), p(x1, y1, z0), p(x1, y1, z1), p(x1, y0, z1)],
                Vec3::x(),
            ),
            Face::new(
                vec![p(x0, y0, z0), p(x1, y0, z0), p(x1, y0, z1), p(x0, y0, z1)],
                -Vec3::y(),
            ),
            Face::new(
                vec![p(x0, y1, z0), p(x0, y1, z1), p(x1, y1, z1), p(x1, y1, z0)],
                Vec3::y(),
            ),
            Face::new(
                vec![p(x0, y0, z0), p(x0, y1, z0), p(x1, y1, z0), p(x1, y0, z0)],
                -Vec3::z(),
            ),
            Face::new(
                vec![p(x0, y0, z1), p(x1, y0, z1), p(x1, y1, z1), p(x0, y1, z1)],
                Vec3::z(),
            ),
        ];

        Self {
            cells: vec![Cell { faces }],
        }
    }

    /// True when the shape has no faces at all.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| c.faces.is_empty())
    }

    /// All faces in flat index order.
    pub fn faces(&self) -> impl Iterator<Item = &Face> {
        self.cells.iter().flat_map(|c| c.faces.iter())
    }

    /// Face by flat index.
    pub fn face(&self, index: usize) -> Option<&Face> {
        self.faces().nth(index)
    }

    /// Total number of faces.
    pub fn face_count(&self) -> usize {
        self.cells.iter().map(|c| c.faces.len()).sum()
    }

    /// Copy of the shape moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|cell| Cell {
                faces: cell
                    .faces
                    .iter()
                    .map(|f| Face {
                        vertices: f.vertices.iter().map(|v| v + offset).collect(),
                        normal: f.normal,
                    })
                    .collect(),
            })
            .collect();
        Self { cells }
    }
}
