//! The cut-view command: the selection decides between creating a cut
//! view and deleting one.

use cutview_ir::{Document, NodeId, NodeKind};

use crate::config::{CutviewConfig, Style};
use crate::cube::{build_cut_cube, prepare_plane, BoxSize};
use crate::delete::delete_cutview;
use crate::dialogs::Dialogs;
use crate::discover::discover;
use crate::error::{CutviewError, Result};
use crate::host::Host;
use crate::label::{letter_group_label, Letter, Ordinal};
use crate::letters::{allocate, free_letters, validate};
use crate::links::create_references;
use crate::orchestrate::orchestrate;
use crate::organize::organize;
use crate::paint::paint_coplanar_faces;
use crate::session::{CutSession, SessionMap, SessionOutcome};

/// How a command invocation ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A cut view was created.
    Created(SessionOutcome),
    /// A cut view was deleted, removing this many objects.
    Deleted(usize),
    /// The user cancelled a dialog.
    Cancelled,
    /// The selected object holds no solids.
    Nothing,
}

/// What the selection asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Request {
    Create { plane: NodeId, root: NodeId },
    Delete { group: NodeId },
}

fn classify(doc: &Document) -> Result<Request> {
    let kinds: Vec<(NodeId, NodeKind)> = doc
        .selection()
        .iter()
        .filter_map(|&id| doc.kind(id).map(|k| (id, k)))
        .collect();
    let is_root = |k: NodeKind| matches!(k, NodeKind::Body | NodeKind::Assembly | NodeKind::Group);
    match kinds.as_slice() {
        &[(group, NodeKind::Group)] => Ok(Request::Delete { group }),
        &[(plane, NodeKind::Plane), (root, kind)] | &[(root, kind), (plane, NodeKind::Plane)]
            if is_root(kind) =>
        {
            Ok(Request::Create { plane, root })
        }
        other => {
            let got: Vec<String> = other.iter().map(|(_, k)| format!("{k:?}")).collect();
            Err(CutviewError::Selection(if got.is_empty() {
                "nothing selected".to_string()
            } else {
                format!("got {}", got.join(", "))
            }))
        }
    }
}

/// Run the command on the host's current selection.
///
/// One group selected deletes that cut view. One plane plus one body,
/// assembly or group creates a cut view. Anything else is a
/// [`CutviewError::Selection`] and changes nothing. Fatal errors are also
/// shown through `dialogs`.
pub fn run<H: Host + ?Sized, D: Dialogs + ?Sized>(
    host: &mut H,
    dialogs: &mut D,
    config: &CutviewConfig,
) -> Result<Outcome> {
    let request = classify(host.document()).inspect_err(|e| dialogs.message(&e.to_string()))?;
    host.document_mut().clear_selection();
    match request {
        Request::Delete { group } => {
            let removed = delete_cutview(host.document_mut(), group)
                .inspect_err(|e| dialogs.message(&e.to_string()))?;
            Ok(Outcome::Deleted(removed))
        }
        Request::Create { plane, root } => create(host, dialogs, config, plane, root),
    }
}

/// Letter and size from the dialogs. `None` when the user cancelled.
fn choose<D: Dialogs + ?Sized>(
    doc: &Document,
    dialogs: &mut D,
    default_size: BoxSize,
) -> Result<Option<(Letter, BoxSize)>> {
    let suggested = allocate(doc)?;
    let Some(letter) = dialogs.choose_letter(suggested, &free_letters(doc)) else {
        return Ok(None);
    };
    let letter = validate(doc, letter)?;
    let Some(size) = dialogs.choose_size(default_size) else {
        return Ok(None);
    };
    Ok(Some((letter, size)))
}

/// Abort the open transaction and hand `err` back.
fn abort<H: Host + ?Sized>(host: &mut H, err: CutviewError) -> CutviewError {
    if let Err(e) = host.document_mut().abort_transaction() {
        log::error!("abort failed: {}", e);
    }
    err
}

fn build_geometry<H: Host + ?Sized>(
    host: &mut H,
    session: &CutSession,
    map: &mut SessionMap,
    style: &Style,
) -> Result<()> {
    let placement = prepare_plane(host.document_mut(), session.plane, session.letter)?;
    // A box without a reference would never be consumed by a cut, and
    // deletion could not reach it
    let linked: Vec<Ordinal> = map
        .iter()
        .filter(|(_, entry)| entry.link.is_some())
        .map(|(ordinal, _)| ordinal)
        .collect();
    for &ordinal in &linked {
        let cube = build_cut_cube(host, placement, session.tag(ordinal), session.size, style)?;
        map.set_cube(ordinal, cube);
    }
    log::info!("built {} cut box(es) on {}", linked.len(), session.plane);
    Ok(())
}

fn create<H: Host + ?Sized, D: Dialogs + ?Sized>(
    host: &mut H,
    dialogs: &mut D,
    config: &CutviewConfig,
    plane: NodeId,
    root: NodeId,
) -> Result<Outcome> {
    host.document_mut().begin_transaction("Create cut view")?;

    let (letter, size) = match choose(host.document(), dialogs, config.defaults.size) {
        Ok(Some(choice)) => choice,
        Ok(None) => {
            host.document_mut().abort_transaction()?;
            log::info!("cut view cancelled");
            return Ok(Outcome::Cancelled);
        }
        Err(e) => {
            dialogs.message(&e.to_string());
            return Err(abort(host, e));
        }
    };

    let discovered = discover(host.document(), root);
    if discovered.is_empty() {
        host.document_mut().abort_transaction()?;
        log::info!("no solids under {}, nothing to cut", root);
        return Ok(Outcome::Nothing);
    }

    let session = CutSession {
        root,
        plane,
        letter,
        size,
    };
    let mut map = SessionMap::new();
    let mut diagnostics = Vec::new();
    if let Err(e) = create_references(host, &session, &discovered, &mut map, &mut diagnostics) {
        return Err(abort(host, e));
    }
    host.document_mut().commit_transaction()?;

    host.document_mut().begin_transaction("Build cut geometry")?;
    if let Err(e) = build_geometry(host, &session, &mut map, &config.style) {
        log::error!("{}", e);
        map.clear_cubes();
        dialogs.message(&e.to_string());
        return Err(abort(host, e));
    }
    host.document_mut().commit_transaction()?;

    orchestrate(host, &session, &mut map, &mut diagnostics)?;
    let outcome = SessionOutcome {
        session,
        map,
        diagnostics,
    };

    host.document_mut().begin_transaction("Group cut view")?;
    if let Err(e) = organize(host.document_mut(), &outcome) {
        return Err(abort(host, e));
    }
    host.document_mut().commit_transaction()?;

    let placement = host.document().placement(plane)?;
    let reversed = config.defaults.reversed;
    for result in outcome.results() {
        paint_coplanar_faces(host, result, &placement, reversed, &config.style)?;
    }

    if !outcome.diagnostics.is_empty() {
        let lines: Vec<String> = outcome.diagnostics.iter().map(|d| d.to_string()).collect();
        dialogs.message(&lines.join("\n"));
    }
    dialogs.reveal(&letter_group_label(letter));
    log::info!(
        "cut view {} created: {} cut(s) from {} solid(s)",
        letter,
        outcome.results().len(),
        outcome.map.len()
    );
    Ok(Outcome::Created(outcome))
}
