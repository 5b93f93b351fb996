//! Document recompute: fill in the shapes of derived nodes.

use cutview_ir::{Dependencies, Document, FeatureSource, NodeData, NodeId, Shape};

use crate::{Kernel, KernelError};

/// Outcome of a recompute pass.
#[derive(Debug, Default)]
pub struct RecomputeReport {
    /// Nodes whose shape was recomputed.
    pub evaluated: usize,
    /// Nodes that failed, with their error. Their shapes are left empty.
    pub failures: Vec<(NodeId, KernelError)>,
}

impl RecomputeReport {
    /// Error recorded for a node, if it failed.
    pub fn failure(&self, id: NodeId) -> Option<&KernelError> {
        self.failures
            .iter()
            .find(|(failed, _)| *failed == id)
            .map(|(_, e)| e)
    }

    /// True if every node evaluated cleanly.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Shape of a node for use as a boolean operand.
///
/// Links resolve to their target; groups and assemblies contribute the
/// cells of every member.
fn operand_shape(doc: &Document, id: NodeId, depth: usize) -> Option<Shape> {
    if depth > 64 {
        return None;
    }
    if let Some(shape) = doc.shape(id) {
        return Some(shape.clone());
    }
    let target = doc.resolve_link(id).into_iter().next()?;
    let node = doc.node(target)?;
    if !matches!(node.data, NodeData::Assembly { .. } | NodeData::Group { .. }) {
        return None;
    }
    let mut cells = Vec::new();
    for &member in node.data.members() {
        if let Some(shape) = operand_shape(doc, member, depth + 1) {
            cells.extend(shape.cells);
        }
    }
    Some(Shape { cells })
}

fn evaluate<K: Kernel + ?Sized>(
    doc: &Document,
    id: NodeId,
    kernel: &K,
) -> Result<Option<Shape>, KernelError> {
    let Some(node) = doc.node(id) else {
        return Ok(None);
    };
    match &node.data {
        NodeData::Feature {
            source:
                FeatureSource::Pad {
                    sketch,
                    length,
                    symmetric,
                },
            ..
        } => {
            let Some(NodeData::Sketch(sk)) = doc.node(*sketch).map(|n| &n.data) else {
                return Err(KernelError::MissingSketch(*sketch));
            };
            kernel.check_sketch(sk)?;
            let profile = kernel.profile(sk)?;
            kernel.extrude(&profile, *length, *symmetric).map(Some)
        }
        NodeData::Body { tip: Some(tip), .. } => {
            Ok(Some(doc.shape(*tip).cloned().unwrap_or_default()))
        }
        NodeData::Cut { base, tool, .. } => {
            let base_shape =
                operand_shape(doc, *base, 0).ok_or(KernelError::MissingShape(*base))?;
            let tool_shape =
                operand_shape(doc, *tool, 0).ok_or(KernelError::MissingShape(*tool))?;
            kernel.subtract(&base_shape, &tool_shape).map(Some)
        }
        _ => Ok(None),
    }
}

/// Recompute every derived shape in dependency order.
///
/// Pads are rebuilt from their sketches, bodies take their tip's shape,
/// and cuts subtract their tool from their base. A failing node gets an
/// empty shape and is recorded in the report; evaluation carries on with
/// the rest of the document.
///
/// # Errors
///
/// Only a dependency cycle aborts the pass.
pub fn recompute<K: Kernel + ?Sized>(
    doc: &mut Document,
    kernel: &K,
) -> Result<RecomputeReport, KernelError> {
    let order = doc.evaluation_order()?;
    let mut report = RecomputeReport::default();

    for id in order {
        let result = evaluate(doc, id, kernel);
        let shape = match result {
            Ok(Some(shape)) => shape,
            Ok(None) => continue,
            Err(e) => {
                log::warn!("recompute of node {} failed: {}", id, e);
                report.failures.push((id, e));
                Shape::empty()
            }
        };
        if let Some(slot) = doc.shape_mut(id) {
            *slot = shape;
            report.evaluated += 1;
        }
    }

    log::debug!(
        "recomputed {} node(s), {} failure(s)",
        report.evaluated,
        report.failures.len()
    );
    Ok(report)
}
