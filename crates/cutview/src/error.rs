//! Error and diagnostic types for cut-view commands.

use std::fmt;

use cutview_ir::{IrError, NodeId};
use cutview_kernel::KernelError;
use thiserror::Error;

use crate::host::{HostCommand, HostError};
use crate::label::{Letter, Ordinal};

/// Errors that stop a cut-view command.
#[derive(Error, Debug)]
pub enum CutviewError {
    /// The selection matches neither the creation nor the deletion pattern.
    #[error("Select one plane and one body, part or assembly to create a cut view, or one cut-view group to delete it ({0})")]
    Selection(String),

    /// Every letter is carried by a cutting plane already.
    #[error("All {} cut-view letters are in use", Letter::COUNT)]
    LetterExhausted,

    /// The chosen letter is carried by another cutting plane.
    #[error("Letter {0} is already used by another cut plane")]
    LetterInUse(Letter),

    /// Box size outside the supported set.
    #[error("Unsupported box size {0}")]
    InvalidBoxSize(u32),

    /// Building a cut box failed.
    #[error("Failed to build {label}: {source}")]
    GeometryConstruction {
        /// Label of the box being built.
        label: String,
        /// Kernel failure.
        #[source]
        source: KernelError,
    },

    /// Document error.
    #[error(transparent)]
    Document(#[from] IrError),

    /// Host command or recompute error.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Result type for cut-view commands.
pub type Result<T> = std::result::Result<T, CutviewError>;

/// Non-fatal problem recorded while a batch carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// No reference/box pair for an ordinal.
    MissingPair {
        /// Ordinal without a pair.
        ordinal: Ordinal,
        /// Whether the reference was found.
        has_link: bool,
        /// Whether the box was found.
        has_cube: bool,
    },
    /// A host command did not produce what was asked for.
    HostRefusal {
        /// Object the command ran on.
        node: NodeId,
        /// The command.
        command: HostCommand,
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingPair {
                ordinal,
                has_link,
                has_cube,
            } => {
                let missing = match (has_link, has_cube) {
                    (false, false) => "reference and box",
                    (false, true) => "reference",
                    _ => "box",
                };
                write!(f, "ordinal {ordinal}: {missing} not found, cut skipped")
            }
            Diagnostic::HostRefusal {
                node,
                command,
                reason,
            } => write!(f, "{command:?} on node {node} refused: {reason}"),
        }
    }
}
