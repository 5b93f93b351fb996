//! Filing of cutting planes and cut results into the cut-view group tree.
//!
//! ```text
//! All_Cutviews
//! ├── Cut_Planes
//! │   ├── Cutplane_A
//! │   └── Cutplane_B
//! ├── Cut_A
//! │   ├── A001_Cut_S1
//! │   └── A002_Cut_S2
//! └── Cut_B
//! ```

use std::collections::HashSet;

use cutview_ir::{Document, NodeData, NodeId, NodeKind};

use crate::error::Result;
use crate::label::{
    is_cut_result, letter_group_label, normalize, ALL_CUTVIEWS, CUT_PLANES, PLANE_PREFIX,
};
use crate::session::SessionOutcome;

/// Groups the organizer filed into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hierarchy {
    /// Top-level `All_Cutviews`.
    pub all: NodeId,
    /// `Cut_Planes`.
    pub planes: NodeId,
    /// `Cut_{letter}` of the session.
    pub letter: NodeId,
}

fn is_group_labeled(doc: &Document, id: NodeId, wanted: &str) -> bool {
    doc.node(id)
        .is_some_and(|n| n.kind() == NodeKind::Group && normalize(&n.label) == wanted)
}

/// Top-level group with this label, created if missing. A variant spelling
/// is re-stamped with the canonical label.
fn ensure_top_level(doc: &mut Document, label: &str) -> Result<NodeId> {
    let wanted = normalize(label);
    let found = doc
        .roots
        .iter()
        .copied()
        .find(|&id| is_group_labeled(doc, id, &wanted));
    match found {
        Some(id) => {
            if doc.label(id) != Some(label) {
                log::info!("renaming '{}' to '{}'", doc.label(id).unwrap_or_default(), label);
                doc.set_label(id, label)?;
            }
            Ok(id)
        }
        None => {
            log::debug!("creating group '{}'", label);
            Ok(doc.add(label, NodeData::group()))
        }
    }
}

/// Group with this label inside `parent`. An existing group elsewhere in
/// the document is moved in; otherwise one is created.
fn ensure_subgroup(doc: &mut Document, parent: NodeId, label: &str) -> Result<NodeId> {
    let wanted = normalize(label);
    let inside = doc
        .members(parent)
        .iter()
        .copied()
        .find(|&id| is_group_labeled(doc, id, &wanted));
    let group = match inside {
        Some(id) => id,
        None => {
            let elsewhere = doc
                .nodes_of_kind(NodeKind::Group)
                .into_iter()
                .find(|&id| id != parent && is_group_labeled(doc, id, &wanted));
            match elsewhere {
                Some(id) => {
                    doc.add_to_group(parent, id)?;
                    id
                }
                None => {
                    log::debug!("creating group '{}'", label);
                    doc.add_child(parent, label, NodeData::group())?
                }
            }
        }
    };
    if doc.label(group) != Some(label) {
        doc.set_label(group, label)?;
    }
    Ok(group)
}

/// File every cutting plane and the session's cut results.
///
/// Safe to run repeatedly: groups are found before they are created and
/// nodes already filed stay where they are.
pub fn organize(doc: &mut Document, outcome: &SessionOutcome) -> Result<Hierarchy> {
    let letter = outcome.session.letter;
    let all = ensure_top_level(doc, ALL_CUTVIEWS)?;
    let planes = ensure_subgroup(doc, all, CUT_PLANES)?;
    let letter_group = ensure_subgroup(doc, all, &letter_group_label(letter))?;

    let cut_planes: Vec<NodeId> = doc
        .nodes
        .values()
        .filter(|n| n.kind() == NodeKind::Plane && n.label.starts_with(PLANE_PREFIX))
        .map(|n| n.id)
        .collect();
    let mut filed = 0;
    for plane in cut_planes {
        filed += usize::from(doc.add_to_group(planes, plane)?);
    }

    let session_results: HashSet<NodeId> = outcome.results().into_iter().collect();
    let session_cubes: HashSet<NodeId> = outcome.cubes().into_iter().collect();
    let results: Vec<NodeId> = doc
        .nodes
        .values()
        .filter(|n| n.kind() != NodeKind::Group && !session_cubes.contains(&n.id))
        .filter(|n| session_results.contains(&n.id) || is_cut_result(&n.label, letter))
        .map(|n| n.id)
        .collect();
    for result in results {
        filed += usize::from(doc.add_to_group(letter_group, result)?);
    }

    log::info!("filed {} object(s) under {}", filed, ALL_CUTVIEWS);
    Ok(Hierarchy {
        all,
        planes,
        letter: letter_group,
    })
}
