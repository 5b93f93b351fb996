//! User interaction seam.

use crate::cube::BoxSize;
use crate::label::Letter;

/// Prompts the creation and deletion flows put in front of the user.
///
/// A GUI implements these as dropdowns and message boxes; the CLI answers
/// them from its arguments.
pub trait Dialogs {
    /// Pick the session letter. `None` cancels.
    fn choose_letter(&mut self, suggested: Letter, available: &[Letter]) -> Option<Letter>;

    /// Pick the box size. `None` cancels.
    fn choose_size(&mut self, default: BoxSize) -> Option<BoxSize>;

    /// Show a message.
    fn message(&mut self, text: &str);

    /// Expand and scroll the object tree to a label.
    fn reveal(&mut self, _label: &str) {}
}

/// Accepts every suggestion and logs messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptDefaults;

impl Dialogs for AcceptDefaults {
    fn choose_letter(&mut self, suggested: Letter, _available: &[Letter]) -> Option<Letter> {
        Some(suggested)
    }

    fn choose_size(&mut self, default: BoxSize) -> Option<BoxSize> {
        Some(default)
    }

    fn message(&mut self, text: &str) {
        log::info!("{}", text);
    }
}
