//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::models::ChangedFile;

/// Trait for rendering assembled files to an output format.
pub trait OutputRenderer {
    /// Render assembled files to a string.
    fn render(&self, files: &[ChangedFile]) -> String;
}
