//! Document object graph for the cutview tooling.
//!
//! A [`Document`] is the host-side store the cut-view operations run
//! against: labeled nodes of a closed set of kinds, ordered containment,
//! view properties, a selection list and a single-level transaction.
//!
//! The graph is declarative. Shapes of derived nodes (pads, bodies, cuts)
//! are filled in by a recompute pass that lives with the geometry kernel.

use cutview_math::Placement;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

mod graph;
mod shape;
mod sketch;
mod transaction;

pub use graph::Dependencies;
pub use shape::{Cell, Face, Shape};
pub use sketch::{Constraint, LineEnd, Sketch, SketchLine, Vertex};

/// Unique identifier for a node in the document.
pub type NodeId = u64;

/// Errors raised by document operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IrError {
    /// No node with this id.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The node cannot hold members.
    #[error("node {0} is not a container")]
    NotAContainer(NodeId),

    /// The node has no placement.
    #[error("node {0} has no placement")]
    NoPlacement(NodeId),

    /// A transaction is already open.
    #[error("transaction '{0}' is already open")]
    TransactionOpen(String),

    /// Commit or abort without an open transaction.
    #[error("no open transaction")]
    NoTransaction,

    /// The dependency graph loops back on itself.
    #[error("dependency cycle through node {0}")]
    Cycle(NodeId),
}

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, IrError>;

/// Closed set of node kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Solid body owning a feature history.
    Body,
    /// Solid-bearing feature (pad, primitive).
    Feature,
    /// Strong link to a whole object.
    Link,
    /// Relative link to an object or some of its sub-elements.
    SubLink,
    /// Assembly container.
    Assembly,
    /// Plain group container.
    Group,
    /// Datum plane.
    Plane,
    /// Constrained 2D sketch.
    Sketch,
    /// Boolean subtraction result.
    Cut,
    /// Anything the cut-view tooling does not care about.
    Other,
}

/// How a feature's shape is produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FeatureSource {
    /// Shape is stored directly.
    Primitive,
    /// Extrusion of a sketch along its normal.
    Pad {
        /// Profile sketch.
        sketch: NodeId,
        /// Extrusion length.
        length: f64,
        /// Extrude half the length to each side of the sketch plane.
        symmetric: bool,
    },
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeData {
    /// Solid body. Its shape is the tip feature's shape once recomputed.
    Body {
        /// Owned features and sketches, in history order.
        features: Vec<NodeId>,
        /// Feature whose shape the body exposes.
        tip: Option<NodeId>,
        /// Current shape.
        shape: Shape,
    },
    /// Solid-bearing feature.
    Feature {
        /// Current shape.
        shape: Shape,
        /// Where the shape comes from.
        source: FeatureSource,
    },
    /// Strong link.
    Link {
        /// Linked object.
        target: NodeId,
    },
    /// Relative link.
    SubLink {
        /// Linked object.
        target: NodeId,
        /// Sub-element names, empty for the whole object.
        #[serde(default)]
        elements: Vec<String>,
    },
    /// Assembly container.
    Assembly {
        /// Members in stored order.
        children: Vec<NodeId>,
    },
    /// Group container.
    Group {
        /// Members in stored order.
        children: Vec<NodeId>,
    },
    /// Datum plane: the placement's local XY plane.
    Plane {
        /// Plane frame.
        placement: Placement,
    },
    /// Sketch.
    Sketch(Sketch),
    /// Boolean subtraction `base - tool`.
    Cut {
        /// Base operand.
        base: NodeId,
        /// Tool operand.
        tool: NodeId,
        /// Current shape.
        shape: Shape,
    },
    /// Opaque node.
    Other,
}

impl NodeData {
    /// Kind tag for this payload.
    pub fn kind(&self) -> NodeKind {
        match self {
            NodeData::Body { .. } => NodeKind::Body,
            NodeData::Feature { .. } => NodeKind::Feature,
            NodeData::Link { .. } => NodeKind::Link,
            NodeData::SubLink { .. } => NodeKind::SubLink,
            NodeData::Assembly { .. } => NodeKind::Assembly,
            NodeData::Group { .. } => NodeKind::Group,
            NodeData::Plane { .. } => NodeKind::Plane,
            NodeData::Sketch(_) => NodeKind::Sketch,
            NodeData::Cut { .. } => NodeKind::Cut,
            NodeData::Other => NodeKind::Other,
        }
    }

    /// Empty group payload.
    pub fn group() -> Self {
        NodeData::Group {
            children: Vec::new(),
        }
    }

    /// Empty assembly payload.
    pub fn assembly() -> Self {
        NodeData::Assembly {
            children: Vec::new(),
        }
    }

    /// Body with a stored shape and no history.
    pub fn body(shape: Shape) -> Self {
        NodeData::Body {
            features: Vec::new(),
            tip: None,
            shape,
        }
    }

    /// Feature with a stored shape.
    pub fn primitive(shape: Shape) -> Self {
        NodeData::Feature {
            shape,
            source: FeatureSource::Primitive,
        }
    }
}

/// RGB color with components in 0.0..=1.0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: f32,
    /// Green.
    pub g: f32,
    /// Blue.
    pub b: f32,
}

impl Color {
    /// Create a color.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

impl From<[f32; 3]> for Color {
    fn from(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

/// Display state of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewProps {
    /// Drawn in the 3D view.
    pub visible: bool,
    /// Pickable in the 3D view.
    pub selectable: bool,
    /// Object color.
    pub color: Color,
    /// Transparency in percent.
    pub transparency: u8,
    /// Per-face colors; empty when the object color applies everywhere.
    #[serde(default)]
    pub face_colors: Vec<Color>,
}

impl Default for ViewProps {
    fn default() -> Self {
        Self {
            visible: true,
            selectable: true,
            color: Color::new(0.8, 0.8, 0.8),
            transparency: 0,
            face_colors: Vec::new(),
        }
    }
}

/// A node in the document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier.
    pub id: NodeId,
    /// Human-readable label, not necessarily unique.
    pub label: String,
    /// Kind-specific payload.
    pub data: NodeData,
    /// Display state.
    #[serde(default)]
    pub view: ViewProps,
}

impl Node {
    /// Kind tag of this node.
    pub fn kind(&self) -> NodeKind {
        self.data.kind()
    }
}

/// A cutview document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Format version string.
    pub version: String,
    /// All nodes, keyed by id. Ids are allocated in creation order.
    pub nodes: BTreeMap<NodeId, Node>,
    /// Top-level nodes in stored order.
    pub roots: Vec<NodeId>,
    #[serde(default)]
    next_id: NodeId,
    #[serde(skip)]
    selection: Vec<NodeId>,
    #[serde(skip)]
    transaction: Option<transaction::Transaction>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            version: "0.1".to_string(),
            nodes: BTreeMap::new(),
            roots: Vec::new(),
            next_id: 1,
            selection: Vec::new(),
            transaction: None,
        }
    }
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serialize to JSON string.
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let mut doc: Document = serde_json::from_str(json)?;
        let max = doc.nodes.keys().next_back().copied().unwrap_or(0);
        doc.next_id = doc.next_id.max(max + 1);
        Ok(doc)
    }

    // =========================================================================
    // Creation and lookup
    // =========================================================================

    /// Add a top-level node.
    pub fn add(&mut self, label: impl Into<String>, data: NodeData) -> NodeId {
        let id = self.insert(label.into(), data);
        self.roots.push(id);
        id
    }

    /// Add a node as the last member of `parent`.
    pub fn add_child(
        &mut self,
        parent: NodeId,
        label: impl Into<String>,
        data: NodeData,
    ) -> Result<NodeId> {
        if !self.get(parent)?.data.is_container() {
            return Err(IrError::NotAContainer(parent));
        }
        let id = self.insert(label.into(), data);
        if let Some(members) = self.members_mut(parent) {
            members.push(id);
        }
        Ok(id)
    }

    fn insert(&mut self, label: String, data: NodeData) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                label,
                data,
                view: ViewProps::default(),
            },
        );
        id
    }

    /// Node by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Mutable node by id.
    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    /// Node by id, or [`IrError::UnknownNode`].
    pub fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(IrError::UnknownNode(id))
    }

    /// Mutable node by id, or [`IrError::UnknownNode`].
    pub fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(IrError::UnknownNode(id))
    }

    /// True if the node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Kind of a node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(Node::kind)
    }

    /// Label of a node.
    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(|n| n.label.as_str())
    }

    /// Replace a node's label.
    pub fn set_label(&mut self, id: NodeId, label: impl Into<String>) -> Result<()> {
        self.get_mut(id)?.label = label.into();
        Ok(())
    }

    /// First node, in id order, carrying exactly this label.
    pub fn find_by_label(&self, label: &str) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| n.label == label)
            .map(|n| n.id)
    }

    /// All nodes of a kind, in id order.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> Vec<NodeId> {
        self.nodes
            .values()
            .filter(|n| n.kind() == kind)
            .map(|n| n.id)
            .collect()
    }

    // =========================================================================
    // View properties and placements
    // =========================================================================

    /// Show or hide a node.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) -> Result<()> {
        self.get_mut(id)?.view.visible = visible;
        Ok(())
    }

    /// Allow or forbid picking a node in the 3D view.
    pub fn set_selectable(&mut self, id: NodeId, selectable: bool) -> Result<()> {
        self.get_mut(id)?.view.selectable = selectable;
        Ok(())
    }

    /// Placement of a plane or sketch.
    pub fn placement(&self, id: NodeId) -> Result<Placement> {
        match &self.get(id)?.data {
            NodeData::Plane { placement } => Ok(*placement),
            NodeData::Sketch(sketch) => Ok(sketch.placement),
            _ => Err(IrError::NoPlacement(id)),
        }
    }

    /// Move a plane or sketch.
    pub fn set_placement(&mut self, id: NodeId, placement: Placement) -> Result<()> {
        match &mut self.get_mut(id)?.data {
            NodeData::Plane { placement: p } => *p = placement,
            NodeData::Sketch(sketch) => sketch.placement = placement,
            _ => return Err(IrError::NoPlacement(id)),
        }
        Ok(())
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Current selection in pick order.
    pub fn selection(&self) -> &[NodeId] {
        &self.selection
    }

    /// Clear the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Append a node to the selection.
    pub fn select(&mut self, id: NodeId) -> Result<()> {
        if !self.contains(id) {
            return Err(IrError::UnknownNode(id));
        }
        if !self.selection.contains(&id) {
            self.selection.push(id);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutview_math::{Point3, Vec3};

    fn unit_box() -> Shape {
        Shape::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn roundtrip_document() {
        let mut doc = Document::new();
        let asm = doc.add("Assembly", NodeData::assembly());
        let body = doc.add_child(asm, "S1", NodeData::body(unit_box())).unwrap();
        doc.add(
            "Plane",
            NodeData::Plane {
                placement: Placement::from_normal(Point3::origin(), Vec3::z()),
            },
        );
        doc.set_visible(body, false).unwrap();

        let json = doc.to_json().expect("serialize");
        let restored = Document::from_json(&json).expect("deserialize");

        assert_eq!(doc.nodes, restored.nodes);
        assert_eq!(doc.roots, restored.roots);

        // Ids keep counting after a reload
        let mut restored = restored;
        let fresh = restored.add("Other", NodeData::Other);
        assert!(fresh > body);
    }

    #[test]
    fn add_child_requires_container() {
        let mut doc = Document::new();
        let plane = doc.add(
            "Plane",
            NodeData::Plane {
                placement: Placement::identity(),
            },
        );
        assert_eq!(
            doc.add_child(plane, "x", NodeData::Other),
            Err(IrError::NotAContainer(plane))
        );
        assert_eq!(
            doc.add_child(99, "x", NodeData::Other),
            Err(IrError::UnknownNode(99))
        );
    }

    #[test]
    fn child_order_is_stored_order() {
        let mut doc = Document::new();
        let g = doc.add("G", NodeData::group());
        let a = doc.add_child(g, "a", NodeData::Other).unwrap();
        let b = doc.add_child(g, "b", NodeData::Other).unwrap();
        assert_eq!(doc.members(g), &[a, b]);
        assert_eq!(doc.roots, vec![g]);
    }

    #[test]
    fn lookup_by_label_and_kind() {
        let mut doc = Document::new();
        let a = doc.add("dup", NodeData::Other);
        doc.add("dup", NodeData::Other);
        let p = doc.add(
            "P",
            NodeData::Plane {
                placement: Placement::identity(),
            },
        );
        assert_eq!(doc.find_by_label("dup"), Some(a));
        assert_eq!(doc.find_by_label("nope"), None);
        assert_eq!(doc.nodes_of_kind(NodeKind::Plane), vec![p]);
        assert_eq!(doc.kind(p), Some(NodeKind::Plane));
    }

    #[test]
    fn placement_only_for_planes_and_sketches() {
        let mut doc = Document::new();
        let p = doc.add(
            "P",
            NodeData::Plane {
                placement: Placement::identity(),
            },
        );
        let moved = Placement::identity().translated(Vec3::new(0.0, 0.0, 1.0));
        doc.set_placement(p, moved).unwrap();
        assert_eq!(doc.placement(p).unwrap(), moved);

        let o = doc.add("O", NodeData::Other);
        assert_eq!(doc.placement(o), Err(IrError::NoPlacement(o)));
    }

    #[test]
    fn selection_is_deduplicated() {
        let mut doc = Document::new();
        let a = doc.add("a", NodeData::Other);
        doc.select(a).unwrap();
        doc.select(a).unwrap();
        assert_eq!(doc.selection(), &[a]);
        assert!(doc.select(42).is_err());
        doc.clear_selection();
        assert!(doc.selection().is_empty());
    }

    #[test]
    fn serde_tagged_node_data() {
        let data = NodeData::Link { target: 3 };
        let json = serde_json::to_string(&data).unwrap();
        assert!(json.contains(r#""type":"Link""#));
        let restored: NodeData = serde_json::from_str(&json).unwrap();
        assert_eq!(data, restored);
    }
}
