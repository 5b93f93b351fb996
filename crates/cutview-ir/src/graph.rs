//! Graph structure of a document: containment, operands, link targets,
//! dependency ordering and bulk removal.

use std::collections::{HashSet, VecDeque};

use crate::{Document, IrError, NodeData, NodeId, NodeKind, Result, Shape};

/// Longest link chain followed before giving up.
const MAX_LINK_DEPTH: usize = 64;

/// Structural edges a node exposes, independent of its kind.
///
/// Traversals are written against this trait instead of matching node
/// kinds, so a new kind only has to say what it contains and what it
/// consumes.
pub trait Dependencies {
    /// Contained nodes, in stored order.
    fn members(&self) -> &[NodeId];

    /// Boolean operand pair `(base, tool)`.
    fn operands(&self) -> Option<(NodeId, NodeId)>;

    /// Object a link points at.
    fn link_target(&self) -> Option<NodeId>;

    /// Nodes whose shapes this node's shape is computed from.
    fn sources(&self) -> Vec<NodeId>;

    /// True if the node can hold members.
    fn is_container(&self) -> bool;
}

impl Dependencies for NodeData {
    fn members(&self) -> &[NodeId] {
        match self {
            NodeData::Body { features, .. } => features,
            NodeData::Assembly { children } | NodeData::Group { children } => children,
            NodeData::Feature { .. }
            | NodeData::Link { .. }
            | NodeData::SubLink { .. }
            | NodeData::Plane { .. }
            | NodeData::Sketch(_)
            | NodeData::Cut { .. }
            | NodeData::Other => &[],
        }
    }

    fn operands(&self) -> Option<(NodeId, NodeId)> {
        match self {
            NodeData::Cut { base, tool, .. } => Some((*base, *tool)),
            _ => None,
        }
    }

    fn link_target(&self) -> Option<NodeId> {
        match self {
            NodeData::Link { target } | NodeData::SubLink { target, .. } => Some(*target),
            _ => None,
        }
    }

    fn sources(&self) -> Vec<NodeId> {
        match self {
            NodeData::Body { tip, .. } => tip.iter().copied().collect(),
            NodeData::Feature { source, .. } => match source {
                crate::FeatureSource::Pad { sketch, .. } => vec![*sketch],
                crate::FeatureSource::Primitive => Vec::new(),
            },
            NodeData::Cut { base, tool, .. } => vec![*base, *tool],
            NodeData::Link { target } | NodeData::SubLink { target, .. } => vec![*target],
            NodeData::Assembly { .. }
            | NodeData::Group { .. }
            | NodeData::Plane { .. }
            | NodeData::Sketch(_)
            | NodeData::Other => Vec::new(),
        }
    }

    fn is_container(&self) -> bool {
        matches!(
            self,
            NodeData::Body { .. } | NodeData::Assembly { .. } | NodeData::Group { .. }
        )
    }
}

impl Document {
    /// Members of a container, empty for anything else.
    pub fn members(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.data.members()).unwrap_or(&[])
    }

    pub(crate) fn members_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        match &mut self.node_mut(id)?.data {
            NodeData::Body { features, .. } => Some(features),
            NodeData::Assembly { children } | NodeData::Group { children } => Some(children),
            _ => None,
        }
    }

    /// Container holding `id`, if any.
    pub fn parent_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes
            .values()
            .find(|n| n.data.members().contains(&id))
            .map(|n| n.id)
    }

    /// Move `node` into `group`.
    ///
    /// The node leaves the document root and any other group or assembly
    /// it was filed in. Returns `false` when it already was a member.
    pub fn add_to_group(&mut self, group: NodeId, node: NodeId) -> Result<bool> {
        if !self.contains(node) {
            return Err(IrError::UnknownNode(node));
        }
        match self.get(group)?.kind() {
            NodeKind::Group | NodeKind::Assembly => {}
            _ => return Err(IrError::NotAContainer(group)),
        }
        if self.members(group).contains(&node) {
            return Ok(false);
        }

        self.roots.retain(|&r| r != node);
        let holders: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| matches!(n.kind(), NodeKind::Group | NodeKind::Assembly))
            .filter(|n| n.data.members().contains(&node))
            .map(|n| n.id)
            .collect();
        for holder in holders {
            if let Some(members) = self.members_mut(holder) {
                members.retain(|&m| m != node);
            }
        }
        if let Some(members) = self.members_mut(group) {
            members.push(node);
        }
        Ok(true)
    }

    /// Final objects behind a link, following link chains.
    ///
    /// A non-link resolves to itself. Chains that loop or run deeper than
    /// a fixed limit resolve to nothing.
    pub fn resolve_link(&self, id: NodeId) -> Vec<NodeId> {
        let mut current = id;
        let mut seen = HashSet::new();
        for _ in 0..MAX_LINK_DEPTH {
            if !seen.insert(current) {
                log::debug!("link chain from {} loops at {}", id, current);
                return Vec::new();
            }
            let Some(node) = self.node(current) else {
                return Vec::new();
            };
            match node.data.link_target() {
                Some(next) => current = next,
                None => return vec![current],
            }
        }
        Vec::new()
    }

    /// Shape of a node; links expose their target's shape.
    pub fn shape(&self, id: NodeId) -> Option<&Shape> {
        let target = self.resolve_link(id).into_iter().next()?;
        match &self.node(target)?.data {
            NodeData::Body { shape, .. }
            | NodeData::Feature { shape, .. }
            | NodeData::Cut { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// Stored shape slot of a body, feature or cut.
    pub fn shape_mut(&mut self, id: NodeId) -> Option<&mut Shape> {
        match &mut self.node_mut(id)?.data {
            NodeData::Body { shape, .. }
            | NodeData::Feature { shape, .. }
            | NodeData::Cut { shape, .. } => Some(shape),
            _ => None,
        }
    }

    /// All nodes ordered so that every node follows its sources.
    pub fn evaluation_order(&self) -> Result<Vec<NodeId>> {
        let mut result = Vec::new();
        let mut visited = HashSet::new();
        let mut in_progress = HashSet::new();

        fn visit(
            id: NodeId,
            doc: &Document,
            visited: &mut HashSet<NodeId>,
            in_progress: &mut HashSet<NodeId>,
            result: &mut Vec<NodeId>,
        ) -> Result<()> {
            if visited.contains(&id) {
                return Ok(());
            }
            if !in_progress.insert(id) {
                return Err(IrError::Cycle(id));
            }
            if let Some(node) = doc.node(id) {
                for source in node.data.sources() {
                    visit(source, doc, visited, in_progress, result)?;
                }
            }
            in_progress.remove(&id);
            visited.insert(id);
            if doc.contains(id) {
                result.push(id);
            }
            Ok(())
        }

        for &id in self.nodes.keys() {
            visit(id, self, &mut visited, &mut in_progress, &mut result)?;
        }
        Ok(result)
    }

    /// Delete a set of nodes in one step.
    ///
    /// Bodies take the features they own with them. Members of a deleted
    /// group or assembly that survive are returned to the document root.
    /// References to deleted nodes are dropped from every membership list
    /// and from the selection. Returns the number of nodes removed.
    pub fn remove_many(&mut self, ids: &[NodeId]) -> usize {
        let mut doomed: HashSet<NodeId> = HashSet::new();
        let mut queue: VecDeque<NodeId> = ids.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            let Some(node) = self.node(id) else {
                continue;
            };
            if !doomed.insert(id) {
                continue;
            }
            if node.kind() == NodeKind::Body {
                queue.extend(node.data.members().iter().copied());
            }
        }

        let mut orphans = Vec::new();
        for &id in &doomed {
            if let Some(node) = self.node(id) {
                if matches!(node.kind(), NodeKind::Group | NodeKind::Assembly) {
                    orphans.extend(
                        node.data
                            .members()
                            .iter()
                            .copied()
                            .filter(|m| !doomed.contains(m)),
                    );
                }
            }
        }

        for id in &doomed {
            self.nodes.remove(id);
        }
        self.roots.retain(|r| !doomed.contains(r));
        let containers: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.data.is_container())
            .map(|n| n.id)
            .collect();
        for id in containers {
            if let Some(members) = self.members_mut(id) {
                members.retain(|m| !doomed.contains(m));
            }
        }
        orphans.sort_unstable();
        for id in orphans {
            if !self.roots.contains(&id) {
                self.roots.push(id);
            }
        }
        self.selection.retain(|s| !doomed.contains(s));

        log::debug!("removed {} node(s)", doomed.len());
        doomed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FeatureSource, Sketch};
    use cutview_math::{Placement, Point3};

    fn unit_box() -> Shape {
        Shape::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn link_chain_resolves_to_final_target() {
        let mut doc = Document::new();
        let body = doc.add("S1", NodeData::body(unit_box()));
        let l1 = doc.add("l1", NodeData::Link { target: body });
        let l2 = doc.add(
            "l2",
            NodeData::SubLink {
                target: l1,
                elements: Vec::new(),
            },
        );
        assert_eq!(doc.resolve_link(l2), vec![body]);
        assert_eq!(doc.resolve_link(body), vec![body]);
        assert_eq!(doc.shape(l2), Some(&unit_box()));
    }

    #[test]
    fn link_cycle_resolves_to_nothing() {
        let mut doc = Document::new();
        let a = doc.add("a", NodeData::Link { target: 2 });
        let b = doc.add("b", NodeData::Link { target: a });
        assert_eq!(b, 2);
        assert!(doc.resolve_link(a).is_empty());
        assert!(doc.shape(a).is_none());
    }

    #[test]
    fn add_to_group_moves_and_is_idempotent() {
        let mut doc = Document::new();
        let g1 = doc.add("g1", NodeData::group());
        let g2 = doc.add("g2", NodeData::group());
        let x = doc.add("x", NodeData::Other);

        assert!(doc.add_to_group(g1, x).unwrap());
        assert!(!doc.add_to_group(g1, x).unwrap());
        assert_eq!(doc.members(g1), &[x]);
        assert!(!doc.roots.contains(&x));

        assert!(doc.add_to_group(g2, x).unwrap());
        assert!(doc.members(g1).is_empty());
        assert_eq!(doc.parent_of(x), Some(g2));
    }

    #[test]
    fn add_to_group_rejects_non_groups() {
        let mut doc = Document::new();
        let body = doc.add("b", NodeData::body(Shape::empty()));
        let x = doc.add("x", NodeData::Other);
        assert_eq!(doc.add_to_group(body, x), Err(IrError::NotAContainer(body)));
    }

    #[test]
    fn evaluation_order_puts_sources_first() {
        let mut doc = Document::new();
        let body = doc.add("B", NodeData::body(Shape::empty()));
        let sketch = doc
            .add_child(body, "Sketch", NodeData::Sketch(Sketch::new(Placement::identity())))
            .unwrap();
        let pad = doc
            .add_child(
                body,
                "Pad",
                NodeData::Feature {
                    shape: Shape::empty(),
                    source: FeatureSource::Pad {
                        sketch,
                        length: 1.0,
                        symmetric: false,
                    },
                },
            )
            .unwrap();
        if let NodeData::Body { tip, .. } = &mut doc.get_mut(body).unwrap().data {
            *tip = Some(pad);
        }
        let other = doc.add("other", NodeData::body(unit_box()));
        let cut = doc.add(
            "cut",
            NodeData::Cut {
                base: other,
                tool: body,
                shape: Shape::empty(),
            },
        );

        let order = doc.evaluation_order().unwrap();
        let pos = |id| order.iter().position(|&x| x == id).unwrap();
        assert!(pos(sketch) < pos(pad));
        assert!(pos(pad) < pos(body));
        assert!(pos(body) < pos(cut));
        assert!(pos(other) < pos(cut));
    }

    #[test]
    fn evaluation_order_detects_cycles() {
        let mut doc = Document::new();
        let a = doc.add(
            "a",
            NodeData::Cut {
                base: 2,
                tool: 2,
                shape: Shape::empty(),
            },
        );
        doc.add(
            "b",
            NodeData::Cut {
                base: a,
                tool: a,
                shape: Shape::empty(),
            },
        );
        assert!(matches!(doc.evaluation_order(), Err(IrError::Cycle(_))));
    }

    #[test]
    fn remove_many_cascades_body_features() {
        let mut doc = Document::new();
        let body = doc.add("B", NodeData::body(Shape::empty()));
        let sketch = doc
            .add_child(body, "Sketch", NodeData::Sketch(Sketch::new(Placement::identity())))
            .unwrap();
        let keep = doc.add("keep", NodeData::Other);

        let removed = doc.remove_many(&[body]);
        assert_eq!(removed, 2);
        assert!(!doc.contains(sketch));
        assert_eq!(doc.roots, vec![keep]);
    }

    #[test]
    fn remove_many_returns_group_members_to_root() {
        let mut doc = Document::new();
        let outer = doc.add("outer", NodeData::group());
        let inner = doc.add_child(outer, "inner", NodeData::group()).unwrap();
        let member = doc.add_child(inner, "m", NodeData::Other).unwrap();
        doc.select(inner).unwrap();

        assert_eq!(doc.remove_many(&[inner, inner]), 1);
        assert!(doc.members(outer).is_empty());
        assert!(doc.roots.contains(&member));
        assert!(doc.selection().is_empty());
    }
}
