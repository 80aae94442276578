//! Per-language import and export patterns.
//!
//! Every function here receives comment-stripped text and returns raw
//! captures; relative-path filtering and deduplication happen in the caller.
//! Matches that begin inside a string literal are text, not statements,
//! and are dropped.

use std::sync::LazyLock;

use regex::Regex;

use super::Language;
use super::strip::Stripped;

/// Raw captures from one source text.
#[derive(Debug, Default)]
pub(crate) struct Captures {
    pub imports: Vec<String>,
    pub exports: Vec<String>,
}

macro_rules! pattern {
    ($name:ident, $re:expr) => {
        static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($re).unwrap());
    };
}

// ── JavaScript / TypeScript ─────────────────────────────────────────

pattern!(
    JS_IMPORT_FROM,
    r#"(?m)^\s*import\s+(?:type\s+)?[\w*{}\s,$]+?\s+from\s+['"]([^'"\n]+)['"]"#
);
pattern!(JS_IMPORT_BARE, r#"(?m)^\s*import\s+['"]([^'"\n]+)['"]"#);
pattern!(
    JS_EXPORT_FROM,
    r#"(?m)^\s*export\s+(?:type\s+)?[\w*{}\s,$]+?\s+from\s+['"]([^'"\n]+)['"]"#
);
pattern!(JS_REQUIRE, r#"\brequire\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#);
pattern!(JS_DYNAMIC_IMPORT, r#"\bimport\s*\(\s*['"]([^'"\n]+)['"]\s*\)"#);
pattern!(
    JS_EXPORT_DECL,
    r"(?m)^\s*export\s+(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(?:async\s+)?(?:class|interface|function\*?|const|let|var|type|enum|namespace)\s+([A-Z][\w$]*)"
);

// ── Rust ────────────────────────────────────────────────────────────

pattern!(
    RUST_USE,
    r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?use\s+((?:self|super|crate)::[^;]+);"
);
pattern!(RUST_MOD, r"(?m)^\s*(?:pub(?:\([^)]*\))?\s+)?mod\s+(\w+)\s*;");
pattern!(
    RUST_EXPORT_DECL,
    r"(?m)^pub\s+(?:(?:async|const|unsafe)\s+)*(?:struct|enum|trait|fn|const|static|type|union)\s+([A-Z]\w*)"
);

// ── Go ──────────────────────────────────────────────────────────────

pattern!(GO_IMPORT_SINGLE, r#"(?m)^\s*import\s+(?:[\w.]+\s+)?"([^"\n]+)""#);
pattern!(GO_IMPORT_BLOCK, r"(?ms)^\s*import\s*\((.*?)\)");
pattern!(GO_QUOTED, r#""([^"\n]+)""#);
pattern!(GO_EXPORT_DECL, r"(?m)^(?:func|type|const|var)\s+([A-Z]\w*)");

// ── Swift / Kotlin / Java ───────────────────────────────────────────

pattern!(
    SWIFT_IMPORT,
    r"(?m)^\s*(?:@\w+\s+)*import\s+(?:(?:typealias|struct|class|enum|protocol|let|var|func)\s+)?([\w.]+)"
);
pattern!(
    SWIFT_EXPORT_DECL,
    r"(?m)^(?:@\w+(?:\([^)\n]*\))?\s+)*(?:public|open)\s+(?:(?:final|static)\s+)*(?:class|struct|enum|protocol|actor|func|typealias|let|var)\s+([A-Z]\w*)"
);
pattern!(KOTLIN_IMPORT, r"(?m)^\s*import\s+([\w.*]+)");
pattern!(
    KOTLIN_EXPORT_DECL,
    r"(?m)^(?:public\s+)?(?:(?:data|sealed|abstract|open|enum|inner|value|annotation|const)\s+)*(?:class|interface|object|fun|val|typealias)\s+([A-Z]\w*)"
);
pattern!(JAVA_IMPORT, r"(?m)^\s*import\s+(?:static\s+)?([\w.*]+)\s*;");
pattern!(
    JAVA_EXPORT_DECL,
    r"(?m)^public\s+(?:(?:abstract|final|sealed|static|strictfp)\s+)*(?:class|interface|enum|record|@interface)\s+([A-Z]\w*)"
);

// ── Python ──────────────────────────────────────────────────────────

pattern!(PY_FROM_IMPORT, r"(?m)^\s*from\s+([.\w]+)\s+import\b");
pattern!(
    PY_FROM_PACKAGE_IMPORT,
    r"(?m)^[ \t]*from[ \t]+(\.+)[ \t]+import[ \t]+([\w \t,]+)$"
);
pattern!(PY_IMPORT, r"(?m)^\s*import\s+([\w.]+)");
pattern!(
    PY_EXPORT_DECL,
    r"(?m)^(?:class|def|async\s+def)\s+([A-Z]\w*)"
);

/// Run the patterns for `language` over comment-stripped `src`.
pub(crate) fn extract(language: Language, src: &Stripped) -> Captures {
    match language {
        Language::JavaScript | Language::TypeScript => Captures {
            imports: collect(
                src,
                &[
                    &JS_IMPORT_FROM,
                    &JS_IMPORT_BARE,
                    &JS_EXPORT_FROM,
                    &JS_REQUIRE,
                    &JS_DYNAMIC_IMPORT,
                ],
            ),
            exports: collect(src, &[&JS_EXPORT_DECL]),
        },
        Language::Rust => {
            let mut imports: Vec<String> = statements(src, &RUST_USE)
                .map(|c| c[1].split_whitespace().collect::<String>())
                .collect();
            imports.extend(statements(src, &RUST_MOD).map(|c| format!("self::{}", &c[1])));
            Captures {
                imports,
                exports: collect(src, &[&RUST_EXPORT_DECL]),
            }
        }
        Language::Go => {
            let mut imports = collect(src, &[&GO_IMPORT_SINGLE]);
            for block in statements(src, &GO_IMPORT_BLOCK) {
                imports.extend(
                    GO_QUOTED
                        .captures_iter(&block[1])
                        .map(|c| c[1].to_string()),
                );
            }
            Captures {
                imports,
                exports: collect(src, &[&GO_EXPORT_DECL]),
            }
        }
        Language::Swift => Captures {
            imports: collect(src, &[&SWIFT_IMPORT]),
            exports: collect(src, &[&SWIFT_EXPORT_DECL]),
        },
        Language::Kotlin => Captures {
            imports: collect(src, &[&KOTLIN_IMPORT]),
            exports: collect(src, &[&KOTLIN_EXPORT_DECL]),
        },
        Language::Java => Captures {
            imports: collect(src, &[&JAVA_IMPORT]),
            exports: collect(src, &[&JAVA_EXPORT_DECL]),
        },
        Language::Python => {
            let mut imports = collect(src, &[&PY_FROM_IMPORT, &PY_IMPORT]);
            // `from . import profile` names sibling modules after `import`.
            for c in statements(src, &PY_FROM_PACKAGE_IMPORT) {
                imports.extend(
                    c[2].split(',')
                        .filter_map(|name| name.split_whitespace().next())
                        .map(|name| format!("{}{name}", &c[1])),
                );
            }
            Captures {
                imports,
                exports: collect(src, &[&PY_EXPORT_DECL]),
            }
        }
        Language::Unknown => Captures::default(),
    }
}

/// Matches of `re` whose statement starts outside every string literal.
///
/// The statement start is the first non-whitespace byte of the match, so
/// the keyword decides; the module string that follows it may of course be
/// a literal.
fn statements<'a>(src: &'a Stripped, re: &'a Regex) -> impl Iterator<Item = regex::Captures<'a>> {
    re.captures_iter(&src.text).filter(move |c| {
        let Some(m) = c.get(0) else { return false };
        let lead = m.as_str().len() - m.as_str().trim_start().len();
        !src.in_string(m.start() + lead)
    })
}

/// First capture group of every code match of every pattern, in pattern order.
fn collect(src: &Stripped, patterns: &[&Regex]) -> Vec<String> {
    patterns
        .iter()
        .flat_map(|re| statements(src, re).map(|c| c[1].to_string()))
        .collect()
}
