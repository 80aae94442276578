//! JSON output renderer.
//!
//! Outputs `{"files": [...], "summary": {...}}` format.

use crate::models::{ChangedFile, Summary};
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, files: &[ChangedFile]) -> String {
        let summary = Summary::from_files(files);

        let output = serde_json::json!({
            "files": files,
            "summary": summary,
        });

        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
