//! Deletion of a cut-view group and everything its cuts were built from.

use std::collections::HashSet;

use cutview_ir::{Dependencies, Document, NodeId, NodeKind};

use crate::error::Result;
use crate::label::CUT_MARKER;

/// What [`delete_cutview`] removes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    /// The selected group.
    pub container: NodeId,
    /// Its children labeled as cuts.
    pub cuts: Vec<NodeId>,
    /// Bodies and references the cuts were built from.
    pub collected: Vec<NodeId>,
}

impl DeletionPlan {
    /// Every node in the plan, deduplicated.
    pub fn all(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        self.collected
            .iter()
            .chain(&self.cuts)
            .chain(std::iter::once(&self.container))
            .copied()
            .filter(|id| seen.insert(*id))
            .collect()
    }
}

fn is_collectable(kind: NodeKind) -> bool {
    matches!(kind, NodeKind::Body | NodeKind::Link | NodeKind::SubLink)
}

/// Walk from each cut through memberships and boolean operands.
///
/// Link targets are never followed, so the objects behind the references
/// survive.
pub fn plan_deletion(doc: &Document, group: NodeId) -> Result<DeletionPlan> {
    let container = doc.get(group)?;
    let cuts: Vec<NodeId> = container
        .data
        .members()
        .iter()
        .copied()
        .filter(|&id| doc.label(id).is_some_and(|l| l.contains(CUT_MARKER)))
        .collect();

    let mut seen: HashSet<NodeId> = HashSet::new();
    let mut collected = Vec::new();
    let mut stack: Vec<NodeId> = cuts.iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        let Some(node) = doc.node(id) else {
            continue;
        };
        if is_collectable(node.kind()) && !cuts.contains(&id) {
            collected.push(id);
        }
        let mut next: Vec<NodeId> = node.data.members().to_vec();
        if let Some((base, tool)) = node.data.operands() {
            next.extend([base, tool]);
        }
        stack.extend(next.into_iter().rev());
    }

    log::debug!(
        "deleting group {}: {} cut(s), {} collected",
        group,
        cuts.len(),
        collected.len()
    );
    Ok(DeletionPlan {
        container: group,
        cuts,
        collected,
    })
}

/// Delete a cut-view group, its cuts and their inputs in one transaction.
///
/// Returns the number of nodes removed, owned features included.
pub fn delete_cutview(doc: &mut Document, group: NodeId) -> Result<usize> {
    let plan = plan_deletion(doc, group)?;
    doc.begin_transaction("Delete cut view")?;
    let removed = doc.remove_many(&plan.all());
    doc.commit_transaction()?;
    log::info!("deleted {} object(s) with group {}", removed, group);
    Ok(removed)
}
