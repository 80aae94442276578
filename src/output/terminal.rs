//! Terminal renderer: one styled block per changed file.

use colored::Colorize;

use crate::context::is_truncated;
use crate::models::{ChangedFile, ContextStrategy, FileStatus, Summary};
use crate::output::OutputRenderer;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

impl OutputRenderer for TerminalRenderer {
    fn render(&self, files: &[ChangedFile]) -> String {
        if files.is_empty() {
            return format!("{}", "  ✔ No changed files.\n".green());
        }

        let mut output = String::new();
        for file in files {
            let status = match file.status {
                FileStatus::Added => "A".green().bold(),
                FileStatus::Modified => "M".yellow().bold(),
                FileStatus::Removed => "D".red().bold(),
                FileStatus::Renamed => "R".blue().bold(),
            };
            let strategy = match file.context_strategy {
                Some(ContextStrategy::DependencyAware) => "dependency_aware".green(),
                Some(ContextStrategy::FullFiles) => "full_files".cyan(),
                Some(ContextStrategy::DiffOnly) => "diff_only".yellow(),
                None => "unenriched".red(),
            };
            output.push_str(&format!(" {} {} [{}]\n", status, file.filename.bold(), strategy));

            if let Some(ref content) = file.full_content {
                let note = if is_truncated(content) { " (truncated)" } else { "" };
                output.push_str(&format!(
                    "   {} {} chars{}\n",
                    "content:".dimmed(),
                    content.chars().count(),
                    note
                ));
            }

            for rf in file.dependencies.iter().flat_map(|d| &d.related_files) {
                output.push_str(&format!("   {} {} ({})\n", "→".cyan(), rf.filename, rf.relationship));
            }

            if let Some(ref reason) = file.degradation {
                output.push_str(&format!("   {} {}\n", "⚠".yellow().bold(), reason));
            }
            output.push('\n');
        }

        let summary = Summary::from_files(files);
        output.push_str(&format!("{}\n", "───────────────────────────────────".dimmed()));
        output.push_str(&format!(
            " {} files: {} with content, {} {}, {} {}, {} degraded\n",
            summary.files.to_string().bold(),
            summary.with_content.to_string().bold(),
            summary.dependents.to_string().green().bold(),
            if summary.dependents == 1 { "dependent" } else { "dependents" },
            summary.tests.to_string().cyan().bold(),
            if summary.tests == 1 { "test" } else { "tests" },
            summary.degraded.to_string().yellow().bold(),
        ));

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Dependencies, RelatedFile, Relationship};

    #[test]
    fn render_empty() {
        let output = TerminalRenderer.render(&[]);
        assert!(output.contains("No changed files"));
    }

    #[test]
    fn render_files() {
        let mut file = ChangedFile::new("services/Profile.ts", FileStatus::Modified, None);
        file.full_content = Some("export class ProfileService {}".into());
        file.context_strategy = Some(ContextStrategy::DependencyAware);
        file.dependencies = Some(Dependencies {
            related_files: vec![RelatedFile {
                filename: "components/Profile.ts".into(),
                relationship: Relationship::Dependent,
                content: String::new(),
                target: "services/Profile.ts".into(),
            }],
        });
        let mut missing = ChangedFile::new("gone.ts", FileStatus::Modified, None);
        missing.context_strategy = Some(ContextStrategy::DiffOnly);
        missing.degradation = Some("content fetch failed: not found: gone.ts".into());

        let output = TerminalRenderer.render(&[file, missing]);
        // Check content is present (may be wrapped in ANSI color codes)
        assert!(output.contains("services/Profile.ts"));
        assert!(output.contains("dependency_aware"));
        assert!(output.contains("components/Profile.ts"));
        assert!(output.contains("(dependent)"));
        assert!(output.contains("not found: gone.ts"));
        assert!(output.contains("files:"));
    }
}
