//! Solid discovery: which objects under a selection get a cut.

use std::collections::HashSet;

use cutview_ir::{Document, NodeId, NodeKind};

/// True for a feature whose shape has faces.
fn is_solid_feature(doc: &Document, id: NodeId) -> bool {
    doc.kind(id) == Some(NodeKind::Feature) && doc.shape(id).is_some_and(|s| !s.is_empty())
}

fn visit(doc: &Document, id: NodeId, seen: &mut HashSet<NodeId>, found: &mut Vec<NodeId>) {
    if !seen.insert(id) {
        return;
    }
    let Some(kind) = doc.kind(id) else {
        return;
    };
    match kind {
        NodeKind::Body => found.push(id),
        NodeKind::Feature => {
            if is_solid_feature(doc, id) {
                found.push(id);
            }
        }
        NodeKind::Link | NodeKind::SubLink => {
            let solid_target = doc.resolve_link(id).into_iter().any(|target| {
                doc.kind(target) == Some(NodeKind::Body) || is_solid_feature(doc, target)
            });
            if solid_target {
                found.push(id);
            }
        }
        NodeKind::Assembly | NodeKind::Group => {
            for &child in doc.members(id) {
                visit(doc, child, seen, found);
            }
        }
        NodeKind::Plane | NodeKind::Sketch | NodeKind::Cut | NodeKind::Other => {}
    }
}

/// Objects under `root` that get a cut, depth first in stored child order.
///
/// Bodies and solid features are taken as they are. Links whose target is
/// a body or solid feature are taken in place of the target. Groups and
/// assemblies are never taken themselves, only searched. Each object
/// appears once, at its first position.
pub fn discover(doc: &Document, root: NodeId) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    let mut found = Vec::new();
    if doc.kind(root) == Some(NodeKind::Assembly) {
        seen.insert(root);
        for &child in doc.members(root) {
            visit(doc, child, &mut seen, &mut found);
        }
    } else {
        visit(doc, root, &mut seen, &mut found);
    }
    log::debug!("discovered {} solid(s) under {}", found.len(), root);
    found
}
