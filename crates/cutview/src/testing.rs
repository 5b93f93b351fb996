//! Shared test fixtures and host doubles.

use cutview_ir::{Document, NodeData, NodeId, Shape, Sketch};
use cutview_kernel::{Kernel, KernelError, PolyKernel, RecomputeReport, SketchProfile};
use cutview_math::{Placement, Point3};

use crate::cube::BoxSize;
use crate::dialogs::Dialogs;
use crate::host::{Host, HostCommand, HostError, Workbench};
use crate::label::Letter;

/// An assembly with two solids side by side and a horizontal plane.
pub struct Fixture {
    pub doc: Document,
    pub assembly: NodeId,
    pub s1: NodeId,
    pub s2: NodeId,
    pub plane: NodeId,
}

/// Two 1900 x 4000 x 4000 blocks, left and right of the YZ plane, in an
/// assembly; an XY plane at the origin at the document root.
pub fn fixture() -> Fixture {
    let mut doc = Document::new();
    let assembly = doc.add("Assembly", NodeData::assembly());
    let s1 = doc
        .add_child(
            assembly,
            "S1",
            NodeData::body(Shape::cuboid(
                Point3::new(-2000.0, -2000.0, -2000.0),
                Point3::new(-100.0, 2000.0, 2000.0),
            )),
        )
        .unwrap();
    let s2 = doc
        .add_child(
            assembly,
            "S2",
            NodeData::body(Shape::cuboid(
                Point3::new(100.0, -2000.0, -2000.0),
                Point3::new(2000.0, 2000.0, 2000.0),
            )),
        )
        .unwrap();
    let plane = doc.add(
        "XY_Plane",
        NodeData::Plane {
            placement: Placement::identity(),
        },
    );
    Fixture {
        doc,
        assembly,
        s1,
        s2,
        plane,
    }
}

/// Fixture document wrapped in a workbench with the selection set for
/// creation.
pub fn creation_workbench() -> (Workbench, Fixture) {
    let f = fixture();
    let mut doc = f.doc.clone();
    doc.select(f.plane).unwrap();
    doc.select(f.assembly).unwrap();
    (Workbench::with_document(doc), f)
}

/// Workbench that refuses to link some objects.
pub struct RefusingHost {
    inner: Workbench,
    refuse: Vec<NodeId>,
}

impl RefusingHost {
    pub fn new(doc: Document, refuse: Vec<NodeId>) -> Self {
        Self {
            inner: Workbench::with_document(doc),
            refuse,
        }
    }
}

impl Host for RefusingHost {
    fn document(&self) -> &Document {
        self.inner.document()
    }

    fn document_mut(&mut self) -> &mut Document {
        self.inner.document_mut()
    }

    fn kernel(&self) -> &dyn Kernel {
        self.inner.kernel()
    }

    fn run_command(&mut self, command: HostCommand) -> Result<Vec<NodeId>, HostError> {
        let refused = self
            .document()
            .selection()
            .iter()
            .any(|id| self.refuse.contains(id));
        if refused && command != HostCommand::Cut {
            return Ok(Vec::new());
        }
        self.inner.run_command(command)
    }

    fn recompute(&mut self) -> Result<RecomputeReport, HostError> {
        self.inner.recompute()
    }
}

/// Kernel whose extrusions always fail.
#[derive(Debug, Default)]
pub struct BrokenExtrude(PolyKernel);

impl Kernel for BrokenExtrude {
    fn check_sketch(&self, sketch: &Sketch) -> Result<(), KernelError> {
        self.0.check_sketch(sketch)
    }

    fn profile(&self, sketch: &Sketch) -> Result<SketchProfile, KernelError> {
        self.0.profile(sketch)
    }

    fn extrude(
        &self,
        _profile: &SketchProfile,
        _length: f64,
        _symmetric: bool,
    ) -> Result<Shape, KernelError> {
        Err(KernelError::ZeroExtrusion)
    }

    fn subtract(&self, base: &Shape, tool: &Shape) -> Result<Shape, KernelError> {
        self.0.subtract(base, tool)
    }
}

/// Dialogs answered from fixed values, recording what was shown.
#[derive(Debug, Default)]
pub struct Scripted {
    /// Letter to pick; `None` takes the suggestion.
    pub letter: Option<Letter>,
    /// Size to pick; `None` takes the default.
    pub size: Option<BoxSize>,
    /// Cancel at the letter prompt.
    pub cancel: bool,
    pub messages: Vec<String>,
    pub revealed: Vec<String>,
}

impl Dialogs for Scripted {
    fn choose_letter(&mut self, suggested: Letter, _available: &[Letter]) -> Option<Letter> {
        if self.cancel {
            return None;
        }
        Some(self.letter.unwrap_or(suggested))
    }

    fn choose_size(&mut self, default: BoxSize) -> Option<BoxSize> {
        Some(self.size.unwrap_or(default))
    }

    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }

    fn reveal(&mut self, label: &str) {
        self.revealed.push(label.to_string());
    }
}
