//! Extension → language table and per-language lexical syntax.

use serde::{Deserialize, Serialize};

use super::strip::CommentSyntax;

/// Languages the parser understands. Anything else maps to `Unknown`,
/// which parses to empty sets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    JavaScript,
    TypeScript,
    Rust,
    Go,
    Swift,
    Kotlin,
    Java,
    Python,
    #[default]
    Unknown,
}

const C_FAMILY: CommentSyntax = CommentSyntax {
    line: "//",
    block: Some(("/*", "*/")),
    nested_blocks: false,
    quotes: &['"', '\''],
    multiline_quotes: &[],
    strip_triple_quoted: false,
};

impl Language {
    /// Detect the language from a path's extension (case-insensitive).
    pub fn from_path(path: &str) -> Self {
        let ext = crate::models::file::extension(path).to_lowercase();
        match ext.as_str() {
            ".js" | ".jsx" | ".mjs" | ".cjs" => Language::JavaScript,
            ".ts" | ".tsx" | ".mts" | ".cts" => Language::TypeScript,
            ".rs" => Language::Rust,
            ".go" => Language::Go,
            ".swift" => Language::Swift,
            ".kt" | ".kts" => Language::Kotlin,
            ".java" => Language::Java,
            ".py" | ".pyi" => Language::Python,
            _ => Language::Unknown,
        }
    }

    /// Keyword that introduces an import statement, used to bias
    /// dependent searches toward importing files.
    pub fn import_keyword(self) -> Option<&'static str> {
        match self {
            Language::JavaScript
            | Language::TypeScript
            | Language::Go
            | Language::Swift
            | Language::Kotlin
            | Language::Java
            | Language::Python => Some("import"),
            Language::Rust => Some("use"),
            Language::Unknown => None,
        }
    }

    /// Whether the language has a same-repository relative import form at all.
    pub fn has_relative_imports(self) -> bool {
        matches!(
            self,
            Language::JavaScript
                | Language::TypeScript
                | Language::Rust
                | Language::Go
                | Language::Python
        )
    }

    /// Whether `import` refers to a module inside the same repository tree.
    pub fn is_relative_import(self, import: &str) -> bool {
        match self {
            Language::JavaScript | Language::TypeScript | Language::Go => {
                import == "."
                    || import == ".."
                    || import.starts_with("./")
                    || import.starts_with("../")
            }
            Language::Python => import.starts_with('.'),
            Language::Rust => ["self::", "super::", "crate::"]
                .iter()
                .any(|p| import.starts_with(p)),
            Language::Swift | Language::Kotlin | Language::Java | Language::Unknown => false,
        }
    }

    pub(crate) fn comment_syntax(self) -> Option<CommentSyntax> {
        match self {
            Language::JavaScript | Language::TypeScript => Some(CommentSyntax {
                quotes: &['"', '\'', '`'],
                multiline_quotes: &['`'],
                ..C_FAMILY
            }),
            Language::Rust => Some(CommentSyntax {
                // '\'' is a lifetime marker far more often than a char literal.
                quotes: &['"'],
                multiline_quotes: &['"'],
                nested_blocks: true,
                ..C_FAMILY
            }),
            Language::Go => Some(CommentSyntax {
                quotes: &['"', '\'', '`'],
                multiline_quotes: &['`'],
                ..C_FAMILY
            }),
            Language::Swift => Some(CommentSyntax {
                quotes: &['"'],
                nested_blocks: true,
                ..C_FAMILY
            }),
            Language::Kotlin | Language::Java => Some(C_FAMILY),
            Language::Python => Some(CommentSyntax {
                line: "#",
                block: None,
                nested_blocks: false,
                quotes: &['"', '\''],
                multiline_quotes: &[],
                strip_triple_quoted: true,
            }),
            Language::Unknown => None,
        }
    }
}
