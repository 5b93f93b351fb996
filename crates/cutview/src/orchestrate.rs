//! Cut orchestration: pair each reference with its box and subtract.

use cutview_ir::{Document, NodeId, NodeKind};

use crate::error::{Diagnostic, Result};
use crate::host::{Host, HostCommand};
use crate::label::{Ordinal, Tag};
use crate::session::{CutSession, SessionMap};

/// The only reference whose label starts with the tag's link prefix.
fn find_link_by_label(doc: &Document, tag: Tag) -> Option<NodeId> {
    let prefix = tag.link_prefix();
    let mut matches = doc.nodes.values().filter(|n| {
        matches!(n.kind(), NodeKind::Link | NodeKind::SubLink) && n.label.starts_with(&prefix)
    });
    let first = matches.next()?;
    match matches.next() {
        Some(_) => None,
        None => Some(first.id),
    }
}

/// Reference for an ordinal: the recorded id if it still exists, the
/// label otherwise.
fn resolve_link(doc: &Document, map: &SessionMap, tag: Tag) -> Option<NodeId> {
    map.get(tag.ordinal)
        .and_then(|e| e.link)
        .filter(|&id| matches!(doc.kind(id), Some(NodeKind::Link | NodeKind::SubLink)))
        .or_else(|| find_link_by_label(doc, tag))
}

/// Box for an ordinal: the recorded id if it still exists, the label
/// otherwise.
fn resolve_cube(doc: &Document, map: &SessionMap, tag: Tag) -> Option<NodeId> {
    map.get(tag.ordinal)
        .and_then(|e| e.cube)
        .filter(|&id| doc.contains(id))
        .or_else(|| doc.find_by_label(&tag.cube_label()))
}

/// Subtract each ordinal's box from its reference and label the result.
///
/// Ordinals run over every discovered object. A missing reference or box
/// skips that ordinal with a [`Diagnostic::MissingPair`]; a refused cut
/// with a [`Diagnostic::HostRefusal`]. One recompute runs at the end.
pub fn orchestrate<H: Host + ?Sized>(
    host: &mut H,
    session: &CutSession,
    map: &mut SessionMap,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<usize> {
    let mut made = 0;
    for ordinal in Ordinal::range(map.len()) {
        let tag = session.tag(ordinal);
        let doc = host.document();
        let link = resolve_link(doc, map, tag);
        let cube = resolve_cube(doc, map, tag);
        let (Some(link), Some(cube)) = (link, cube) else {
            log::warn!("{}: no reference/box pair, skipping", tag);
            diagnostics.push(Diagnostic::MissingPair {
                ordinal,
                has_link: link.is_some(),
                has_cube: cube.is_some(),
            });
            continue;
        };

        let link_label = doc.get(link)?.label.clone();
        let original = match tag.original_from_link(&link_label) {
            Some(original) => original.to_string(),
            None => map
                .get(ordinal)
                .map(|e| e.original.clone())
                .unwrap_or_default(),
        };

        let doc = host.document_mut();
        doc.clear_selection();
        doc.select(link)?;
        doc.select(cube)?;
        let created = host.run_command(HostCommand::Cut);
        host.document_mut().clear_selection();

        let result = match created.as_deref() {
            Ok(&[cut]) if host.document().kind(cut) == Some(NodeKind::Cut) => cut,
            Ok(other) => {
                let reason = format!("expected one cut, got {} object(s)", other.len());
                log::warn!("{}: {}", tag, reason);
                diagnostics.push(Diagnostic::HostRefusal {
                    node: link,
                    command: HostCommand::Cut,
                    reason,
                });
                continue;
            }
            Err(e) => {
                log::warn!("{}: cut refused: {}", tag, e);
                diagnostics.push(Diagnostic::HostRefusal {
                    node: link,
                    command: HostCommand::Cut,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        host.document_mut()
            .set_label(result, tag.cut_label(&original))?;
        map.set_result(ordinal, result);
        made += 1;
    }

    host.recompute()?;
    log::info!("made {} of {} cut(s) for letter {}", made, map.len(), session.letter);
    Ok(made)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Style;
    use crate::cube::{build_cut_cube, BoxSize};
    use crate::host::Workbench;
    use crate::label::Letter;
    use crate::links::create_references;
    use crate::testing::fixture;
    use cutview_kernel::query::volume;
    use cutview_math::Placement;

    fn prepared() -> (Workbench, CutSession, SessionMap) {
        let f = fixture();
        let mut wb = Workbench::with_document(f.doc);
        let session = CutSession {
            root: f.assembly,
            plane: f.plane,
            letter: Letter::new('A').unwrap(),
            size: BoxSize::S1000,
        };
        let mut map = SessionMap::new();
        let mut diags = Vec::new();
        create_references(&mut wb, &session, &[f.s1, f.s2], &mut map, &mut diags).unwrap();
        for ordinal in Ordinal::range(2) {
            let cube = build_cut_cube(
                &mut wb,
                Placement::identity(),
                session.tag(ordinal),
                session.size,
                &Style::default(),
            )
            .unwrap();
            map.set_cube(ordinal, cube);
        }
        (wb, session, map)
    }

    #[test]
    fn every_pair_is_cut_and_labeled() {
        let (mut wb, session, mut map) = prepared();
        let mut diags = Vec::new();
        let made = orchestrate(&mut wb, &session, &mut map, &mut diags).unwrap();

        assert_eq!(made, 2);
        assert!(diags.is_empty());
        let results = map.results();
        let doc = wb.document();
        assert_eq!(doc.label(results[0]), Some("A001_Cut_S1"));
        assert_eq!(doc.label(results[1]), Some("A002_Cut_S2"));

        // The box overlaps S1 over 400 x 1000 x 1000
        let expected = 1900.0 * 4000.0 * 4000.0 - 400.0 * 1000.0 * 1000.0;
        let v = volume(doc.shape(results[0]).unwrap());
        assert!((v - expected).abs() / expected < 1e-9);
    }

    #[test]
    fn missing_cube_is_skipped() {
        let (mut wb, session, mut map) = prepared();
        let cube = map.cubes()[0];
        wb.document_mut().remove_many(&[cube]);
        let mut diags = Vec::new();
        let made = orchestrate(&mut wb, &session, &mut map, &mut diags).unwrap();

        assert_eq!(made, 1);
        assert_eq!(
            diags,
            vec![Diagnostic::MissingPair {
                ordinal: Ordinal::from_index(0),
                has_link: true,
                has_cube: false,
            }]
        );
    }

    #[test]
    fn labels_are_the_fallback_for_lost_ids() {
        let (mut wb, session, mut map) = prepared();
        let mut fresh = SessionMap::new();
        for (ordinal, entry) in map.iter() {
            fresh.discovered(ordinal, entry.source, entry.original.clone());
        }
        let mut diags = Vec::new();
        let made = orchestrate(&mut wb, &session, &mut fresh, &mut diags).unwrap();
        assert_eq!(made, 2);
        assert!(diags.is_empty());
        assert_eq!(fresh.results().len(), 2);
        assert!(map.results().is_empty());
    }

    #[test]
    fn original_label_survives_markers() {
        let f = fixture();
        let mut doc = f.doc;
        doc.set_label(f.s1, "A001_Link_odd_Cut_name").unwrap();
        let mut wb = Workbench::with_document(doc);
        let session = CutSession {
            root: f.assembly,
            plane: f.plane,
            letter: Letter::new('A').unwrap(),
            size: BoxSize::S500,
        };
        let mut map = SessionMap::new();
        let mut diags = Vec::new();
        create_references(&mut wb, &session, &[f.s1], &mut map, &mut diags).unwrap();
        let ordinal = Ordinal::from_index(0);
        let cube = build_cut_cube(
            &mut wb,
            Placement::identity(),
            session.tag(ordinal),
            session.size,
            &Style::default(),
        )
        .unwrap();
        map.set_cube(ordinal, cube);

        orchestrate(&mut wb, &session, &mut map, &mut diags).unwrap();
        let result = map.results()[0];
        assert_eq!(
            wb.document().label(result),
            Some("A001_Cut_A001_Link_odd_Cut_name")
        );
    }
}
