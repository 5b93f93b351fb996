//! Session letter allocation.

use std::collections::BTreeSet;

use cutview_ir::{Document, NodeKind};

use crate::error::{CutviewError, Result};
use crate::label::{group_letter, plane_letter, Letter, CUT_PLANES};

/// Letters held by existing cutting planes or `Cut_{letter}` groups.
///
/// Planes are read from the members of the `Cut_Planes` group when there
/// is one, and from every plane in the document otherwise. A group keeps
/// its letter taken even after its plane was relabeled by a later view.
pub fn used_letters(doc: &Document) -> BTreeSet<Letter> {
    let planes_group = doc
        .nodes_of_kind(NodeKind::Group)
        .into_iter()
        .find(|&id| doc.label(id) == Some(CUT_PLANES));
    let candidates = match planes_group {
        Some(group) => doc.members(group).to_vec(),
        None => doc.nodes_of_kind(NodeKind::Plane),
    };
    let mut used: BTreeSet<Letter> = candidates
        .into_iter()
        .filter_map(|id| doc.label(id).and_then(plane_letter))
        .collect();
    used.extend(
        doc.nodes_of_kind(NodeKind::Group)
            .into_iter()
            .filter_map(|id| doc.label(id).and_then(group_letter)),
    );
    used
}

/// Letters not held by any cutting plane or letter group, in alphabet order.
pub fn free_letters(doc: &Document) -> Vec<Letter> {
    let used = used_letters(doc);
    Letter::all().filter(|l| !used.contains(l)).collect()
}

/// First free letter.
///
/// # Errors
///
/// [`CutviewError::LetterExhausted`] when all 26 are taken.
pub fn allocate(doc: &Document) -> Result<Letter> {
    free_letters(doc)
        .first()
        .copied()
        .ok_or(CutviewError::LetterExhausted)
}

/// Check a letter picked by the user.
///
/// # Errors
///
/// [`CutviewError::LetterInUse`] if a cutting plane or group holds it.
pub fn validate(doc: &Document, letter: Letter) -> Result<Letter> {
    if used_letters(doc).contains(&letter) {
        return Err(CutviewError::LetterInUse(letter));
    }
    Ok(letter)
}
