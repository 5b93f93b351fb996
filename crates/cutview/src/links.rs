//! Reference creation: one disposable link per discovered solid.

use cutview_ir::{NodeId, NodeKind};

use crate::error::{Diagnostic, Result};
use crate::host::{Host, HostCommand};
use crate::label::Ordinal;
use crate::session::{CutSession, SessionMap};

/// Link command for an object: strong links for bodies, relative links
/// for everything else.
pub fn link_command(kind: NodeKind) -> HostCommand {
    match kind {
        NodeKind::Body => HostCommand::LinkMake,
        _ => HostCommand::LinkMakeRelative,
    }
}

/// Run the link command for one object and check it produced exactly one
/// object of the expected kind.
fn make_link<H: Host + ?Sized>(
    host: &mut H,
    source: NodeId,
    command: HostCommand,
) -> std::result::Result<NodeId, String> {
    let doc = host.document_mut();
    doc.clear_selection();
    doc.select(source).map_err(|e| e.to_string())?;
    let created = host.run_command(command).map_err(|e| e.to_string())?;
    host.document_mut().clear_selection();

    let expected = command.creates();
    match created.as_slice() {
        &[link] if host.document().kind(link) == Some(expected) => Ok(link),
        &[link] => Err(format!(
            "expected a {:?}, got {:?}",
            expected,
            host.document().kind(link)
        )),
        other => Err(format!("expected one {:?}, got {} object(s)", expected, other.len())),
    }
}

/// Create and label a reference for each discovered object.
///
/// Ordinals follow the order of `discovered`. Bodies are hidden once
/// linked, and every assembly in the document is hidden. A single
/// recompute runs at the end. Objects the host refuses to link are
/// skipped with a [`Diagnostic::HostRefusal`].
pub fn create_references<H: Host + ?Sized>(
    host: &mut H,
    session: &CutSession,
    discovered: &[NodeId],
    map: &mut SessionMap,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<()> {
    for (index, &source) in discovered.iter().enumerate() {
        let ordinal = Ordinal::from_index(index);
        let node = host.document().get(source)?;
        let original = node.label.clone();
        let kind = node.kind();
        map.discovered(ordinal, source, original.as_str());

        let command = link_command(kind);
        let link = match make_link(host, source, command) {
            Ok(link) => link,
            Err(reason) => {
                log::warn!("{} of '{}' refused: {}", session.tag(ordinal), original, reason);
                diagnostics.push(Diagnostic::HostRefusal {
                    node: source,
                    command,
                    reason,
                });
                continue;
            }
        };

        let doc = host.document_mut();
        doc.set_label(link, session.tag(ordinal).link_label(&original))?;
        if kind == NodeKind::Body {
            doc.set_visible(source, false)?;
        }
        map.set_link(ordinal, link);
    }

    let doc = host.document_mut();
    for assembly in doc.nodes_of_kind(NodeKind::Assembly) {
        doc.set_visible(assembly, false)?;
    }
    host.recompute()?;

    log::info!(
        "created {} of {} reference(s) for letter {}",
        map.links().len(),
        discovered.len(),
        session.letter
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cube::BoxSize;
    use crate::host::Workbench;
    use crate::label::Letter;
    use crate::testing::{fixture, RefusingHost};

    fn session(root: NodeId, plane: NodeId) -> CutSession {
        CutSession {
            root,
            plane,
            letter: Letter::new('A').unwrap(),
            size: BoxSize::S1000,
        }
    }

    #[test]
    fn labels_follow_discovery_order() {
        let f = fixture();
        let mut wb = Workbench::with_document(f.doc);
        let mut map = SessionMap::new();
        let mut diags = Vec::new();
        create_references(
            &mut wb,
            &session(f.assembly, f.plane),
            &[f.s1, f.s2],
            &mut map,
            &mut diags,
        )
        .unwrap();

        assert!(diags.is_empty());
        let doc = wb.document();
        let links = map.links();
        assert_eq!(links.len(), 2);
        assert_eq!(doc.label(links[0]), Some("A001_Link_S1"));
        assert_eq!(doc.label(links[1]), Some("A002_Link_S2"));
        assert_eq!(doc.kind(links[0]), Some(NodeKind::Link));

        // Bodies and the assembly are hidden
        assert!(!doc.get(f.s1).unwrap().view.visible);
        assert!(!doc.get(f.assembly).unwrap().view.visible);
    }

    #[test]
    fn non_bodies_get_relative_links() {
        assert_eq!(link_command(NodeKind::Body), HostCommand::LinkMake);
        assert_eq!(link_command(NodeKind::Feature), HostCommand::LinkMakeRelative);
        assert_eq!(link_command(NodeKind::Link), HostCommand::LinkMakeRelative);
    }

    #[test]
    fn refused_links_are_skipped() {
        let f = fixture();
        let mut host = RefusingHost::new(f.doc, vec![f.s1]);
        let mut map = SessionMap::new();
        let mut diags = Vec::new();
        create_references(
            &mut host,
            &session(f.assembly, f.plane),
            &[f.s1, f.s2],
            &mut map,
            &mut diags,
        )
        .unwrap();

        assert_eq!(map.len(), 2);
        let links = map.links();
        assert_eq!(links.len(), 1);
        assert_eq!(host.document().label(links[0]), Some("A002_Link_S2"));
        assert!(matches!(
            diags.as_slice(),
            [Diagnostic::HostRefusal { node, command: HostCommand::LinkMake, .. }] if *node == f.s1
        ));
        // Refused body stays visible
        assert!(host.document().get(f.s1).unwrap().view.visible);
    }
}
