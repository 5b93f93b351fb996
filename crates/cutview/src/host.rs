//! The host application seam: document access, recompute and the named
//! commands that act on the selection.

use cutview_ir::{Document, IrError, NodeData, NodeId, NodeKind, Shape};
use cutview_kernel::{recompute, Kernel, KernelError, PolyKernel, RecomputeReport};
use thiserror::Error;

/// Commands the host runs on the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HostCommand {
    /// Strong link to each selected object.
    LinkMake,
    /// Relative link to each selected object.
    LinkMakeRelative,
    /// Subtract the second selected object from the first.
    Cut,
}

impl HostCommand {
    /// Kind of object the command creates.
    pub fn creates(self) -> NodeKind {
        match self {
            HostCommand::LinkMake => NodeKind::Link,
            HostCommand::LinkMakeRelative => NodeKind::SubLink,
            HostCommand::Cut => NodeKind::Cut,
        }
    }
}

/// Errors raised by host commands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HostError {
    /// The command needs a different number of selected objects.
    #[error("{command:?} needs {expected} selected object(s), got {got}")]
    SelectionArity {
        /// Command that was run.
        command: HostCommand,
        /// Required selection size.
        expected: usize,
        /// Actual selection size.
        got: usize,
    },

    /// Document error.
    #[error(transparent)]
    Document(#[from] IrError),

    /// Recompute error.
    #[error(transparent)]
    Kernel(#[from] KernelError),
}

/// What the cut-view flows need from the host application.
pub trait Host {
    /// The active document.
    fn document(&self) -> &Document;

    /// The active document, mutably.
    fn document_mut(&mut self) -> &mut Document;

    /// Geometry kernel used for sketches, pads and face queries.
    fn kernel(&self) -> &dyn Kernel;

    /// Run a command on the current selection, returning the objects it
    /// created.
    fn run_command(&mut self, command: HostCommand) -> Result<Vec<NodeId>, HostError>;

    /// Recompute every derived shape.
    fn recompute(&mut self) -> Result<RecomputeReport, HostError>;
}

/// In-memory host: a document plus a kernel.
#[derive(Debug, Clone)]
pub struct Workbench<K = PolyKernel> {
    doc: Document,
    kernel: K,
}

impl Default for Workbench<PolyKernel> {
    fn default() -> Self {
        Self::new(Document::new(), PolyKernel::default())
    }
}

impl Workbench {
    /// Wrap a document, using the convex-cell kernel.
    pub fn with_document(doc: Document) -> Self {
        Self::new(doc, PolyKernel::default())
    }
}

impl<K: Kernel> Workbench<K> {
    /// Wrap a document.
    pub fn new(doc: Document, kernel: K) -> Self {
        Self { doc, kernel }
    }

    /// Give the document back.
    pub fn into_document(self) -> Document {
        self.doc
    }

    fn make_links(&mut self, command: HostCommand) -> Result<Vec<NodeId>, HostError> {
        let selection = self.doc.selection().to_vec();
        if selection.is_empty() {
            return Err(HostError::SelectionArity {
                command,
                expected: 1,
                got: 0,
            });
        }
        let mut created = Vec::with_capacity(selection.len());
        for target in selection {
            let label = self.doc.get(target)?.label.clone();
            let data = match command {
                HostCommand::LinkMake => NodeData::Link { target },
                _ => NodeData::SubLink {
                    target,
                    elements: Vec::new(),
                },
            };
            created.push(self.doc.add(label, data));
        }
        Ok(created)
    }

    fn make_cut(&mut self) -> Result<Vec<NodeId>, HostError> {
        let &[base, tool] = self.doc.selection() else {
            return Err(HostError::SelectionArity {
                command: HostCommand::Cut,
                expected: 2,
                got: self.doc.selection().len(),
            });
        };
        let cut = self.doc.add(
            "Cut",
            NodeData::Cut {
                base,
                tool,
                shape: Shape::empty(),
            },
        );
        self.doc.set_visible(base, false)?;
        self.doc.set_visible(tool, false)?;
        Ok(vec![cut])
    }
}

impl<K: Kernel> Host for Workbench<K> {
    fn document(&self) -> &Document {
        &self.doc
    }

    fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    fn kernel(&self) -> &dyn Kernel {
        &self.kernel
    }

    fn run_command(&mut self, command: HostCommand) -> Result<Vec<NodeId>, HostError> {
        log::debug!("run {:?} on {:?}", command, self.doc.selection());
        match command {
            HostCommand::LinkMake | HostCommand::LinkMakeRelative => self.make_links(command),
            HostCommand::Cut => self.make_cut(),
        }
    }

    fn recompute(&mut self) -> Result<RecomputeReport, HostError> {
        Ok(recompute(&mut self.doc, &self.kernel)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cutview_math::Point3;

    fn solid(doc: &mut Document, label: &str) -> NodeId {
        doc.add(
            label,
            NodeData::body(Shape::cuboid(Point3::origin(), Point3::new(1.0, 1.0, 1.0))),
        )
    }

    #[test]
    fn link_commands_create_one_link_per_selected_object() {
        let mut wb = Workbench::with_document(Document::new());
        let a = solid(wb.document_mut(), "A");
        let b = solid(wb.document_mut(), "B");
        wb.document_mut().select(a).unwrap();
        wb.document_mut().select(b).unwrap();

        let strong = wb.run_command(HostCommand::LinkMake).unwrap();
        assert_eq!(strong.len(), 2);
        let doc = wb.document();
        assert_eq!(doc.kind(strong[0]), Some(NodeKind::Link));
        assert_eq!(doc.label(strong[1]), Some("B"));

        let weak = wb.run_command(HostCommand::LinkMakeRelative).unwrap();
        assert_eq!(wb.document().kind(weak[0]), Some(NodeKind::SubLink));
    }

    #[test]
    fn link_without_selection_fails() {
        let mut wb = Workbench::with_document(Document::new());
        assert!(matches!(
            wb.run_command(HostCommand::LinkMake),
            Err(HostError::SelectionArity { got: 0, .. })
        ));
    }

    #[test]
    fn cut_hides_operands_and_recomputes() {
        let mut wb = Workbench::with_document(Document::new());
        let base = solid(wb.document_mut(), "Base");
        let tool = wb.document_mut().add(
            "Tool",
            NodeData::body(Shape::cuboid(
                Point3::new(-1.0, -1.0, 0.5),
                Point3::new(2.0, 2.0, 2.0),
            )),
        );
        wb.document_mut().select(base).unwrap();
        wb.document_mut().select(tool).unwrap();
        let cut = wb.run_command(HostCommand::Cut).unwrap()[0];

        let doc = wb.document();
        assert_eq!(doc.kind(cut), Some(NodeKind::Cut));
        assert!(!doc.get(base).unwrap().view.visible);
        assert!(!doc.get(tool).unwrap().view.visible);

        let report = wb.recompute().unwrap();
        assert!(report.is_clean());
        let volume = cutview_kernel::query::volume(wb.document().shape(cut).unwrap());
        assert!((volume - 0.5).abs() < 1e-9);
    }

    #[test]
    fn cut_needs_two_objects() {
        let mut wb = Workbench::with_document(Document::new());
        let base = solid(wb.document_mut(), "Base");
        wb.document_mut().select(base).unwrap();
        assert_eq!(
            wb.run_command(HostCommand::Cut),
            Err(HostError::SelectionArity {
                command: HostCommand::Cut,
                expected: 2,
                got: 1
            })
        );
    }
}
