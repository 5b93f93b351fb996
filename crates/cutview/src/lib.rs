#![warn(missing_docs)]

//! cutview: cut views of CAD assemblies
//!
//! Picks every solid under a selected assembly, body or group, stands a
//! disposable link in for each, subtracts a box centered on a cutting plane
//! from every link, files the results under `All_Cutviews/Cut_{letter}` and
//! marks the faces the cut leaves on the plane. Selecting a `Cut_{letter}`
//! group instead tears the view down again.
//!
//! # Example
//!
//! ```rust,no_run
//! use cutview::{run, AcceptDefaults, CutviewConfig, Host, Workbench};
//! use cutview_ir::Document;
//!
//! let json = std::fs::read_to_string("assembly.json").unwrap();
//! let mut wb = Workbench::with_document(Document::from_json(&json).unwrap());
//! let plane = wb.document().find_by_label("XY_Plane").unwrap();
//! let root = wb.document().find_by_label("Assembly").unwrap();
//! wb.document_mut().select(plane).unwrap();
//! wb.document_mut().select(root).unwrap();
//!
//! let outcome = run(&mut wb, &mut AcceptDefaults, &CutviewConfig::default()).unwrap();
//! println!("{outcome:?}");
//! ```

pub mod command;
pub mod config;
pub mod cube;
pub mod delete;
pub mod dialogs;
pub mod discover;
pub mod error;
pub mod host;
pub mod label;
pub mod letters;
pub mod links;
pub mod orchestrate;
pub mod organize;
pub mod paint;
pub mod session;

#[cfg(test)]
mod testing;

pub use command::{run, Outcome};
pub use config::{ConfigError, CutviewConfig, Defaults, Style};
pub use cube::BoxSize;
pub use delete::{delete_cutview, plan_deletion, DeletionPlan};
pub use dialogs::{AcceptDefaults, Dialogs};
pub use error::{CutviewError, Diagnostic, Result};
pub use host::{Host, HostCommand, HostError, Workbench};
pub use label::{Letter, Ordinal, Tag};
pub use organize::Hierarchy;
pub use session::{CutSession, SessionEntry, SessionMap, SessionOutcome};
