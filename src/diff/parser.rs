//! Unified diff format parser.
//!
//! Parses the output of `git diff` (unified format) into changed-file
//! descriptors carrying each file's hunk text as its patch.

use crate::models::{ChangedFile, FileStatus};

/// Parse a unified diff string into a list of changed files.
pub fn parse_unified_diff(input: &str) -> Vec<ChangedFile> {
    let mut files: Vec<ChangedFile> = Vec::new();
    let mut lines = input.lines().peekable();

    while let Some(line) = lines.next() {
        // Look for "diff --git a/... b/..."
        if !line.starts_with("diff --git ") {
            continue;
        }

        let (old_path, new_path) = parse_diff_header(line);
        let mut status = FileStatus::Modified;
        let mut is_binary = false;
        let mut patch: Vec<&str> = Vec::new();

        // Extended headers until the first hunk, then hunk text until the next file
        while let Some(&next) = lines.peek() {
            if next.starts_with("diff --git ") {
                break;
            }
            lines.next();
            if !patch.is_empty() {
                patch.push(next);
            } else if next.starts_with("@@") {
                patch.push(next);
            } else if next.starts_with("new file mode") {
                status = FileStatus::Added;
            } else if next.starts_with("deleted file mode") {
                status = FileStatus::Removed;
            } else if next.starts_with("rename from") || next.starts_with("rename to") {
                status = FileStatus::Renamed;
            } else if next.starts_with("Binary files") || next.starts_with("GIT binary patch") {
                is_binary = true;
            }
        }

        let filename = if status == FileStatus::Removed {
            old_path
        } else {
            new_path
        };
        let patch = if is_binary || patch.is_empty() {
            None
        } else {
            let mut text = patch.join("\n");
            text.push('\n');
            Some(text)
        };

        files.push(ChangedFile::new(filename, status, patch));
    }

    files
}

/// Parse the "diff --git a/path b/path" header line.
fn parse_diff_header(line: &str) -> (String, String) {
    let rest = line.strip_prefix("diff --git ").unwrap_or(line);

    // Handle paths with spaces by finding the second prefix separator
    // Paths are prefixed with a/ and b/ (default), or c/w/i/o/ when
    // git's diff.mnemonicPrefix is enabled.
    if let Some(b_idx) = find_second_prefix(rest) {
        let a_part = &rest[..b_idx];
        let b_part = &rest[b_idx + 1..]; // skip the space

        let old_path = strip_diff_prefix(a_part).to_string();
        let new_path = strip_diff_prefix(b_part).to_string();
        (old_path, new_path)
    } else {
        let (a_part, b_part) = rest.split_once(' ').unwrap_or((rest, ""));
        (
            strip_diff_prefix(a_part).to_string(),
            strip_diff_prefix(b_part).to_string(),
        )
    }
}

/// Strip a single-character git diff prefix (`a/`, `b/`, `c/`, `w/`, `i/`, `o/`).
fn strip_diff_prefix(path: &str) -> &str {
    if path.len() >= 2 {
        let bytes = path.as_bytes();
        if bytes[1] == b'/' && matches!(bytes[0], b'a' | b'b' | b'c' | b'w' | b'i' | b'o') {
            return &path[2..];
        }
    }
    path
}

/// Find the position of the second path prefix separator in a diff header.
fn find_second_prefix(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (1..bytes.len().saturating_sub(1)).find(|&i| {
        bytes[i] == b' '
            && bytes.get(i + 2) == Some(&b'/')
            && matches!(bytes.get(i + 1), Some(b'a' | b'b' | b'c' | b'w' | b'i' | b'o'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE_DIFF: &str = r#"diff --git a/src/main.rs b/src/main.rs
index 1234567..abcdefg 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -1,5 +1,6 @@
 fn main() {
-    println!("Hello");
+    println!("Hello, world!");
+    println!("Goodbye!");
     let x = 42;
 }
"#;

    #[test]
    fn parse_simple_diff() {
        let files = parse_unified_diff(SAMPLE_DIFF);
        assert_eq!(files.len(), 1);

        let file = &files[0];
        assert_eq!(file.filename, "src/main.rs");
        assert_eq!(file.status, FileStatus::Modified);
        let patch = file.patch.as_deref().unwrap();
        assert!(patch.starts_with("@@ -1,5 +1,6 @@\n fn main() {\n"));
        assert!(patch.ends_with(" }\n"));
        assert_eq!(patch.lines().count(), 7);
        assert!(file.full_content.is_none());
        assert!(file.context_strategy.is_none());
    }

    #[test]
    fn parse_new_file() {
        let diff = r#"diff --git a/new_file.rs b/new_file.rs
new file mode 100644
index 0000000..1234567
--- /dev/null
+++ b/new_file.rs
@@ -0,0 +1,3 @@
+fn hello() {
+    println!("new!");
+}
"#;
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, FileStatus::Added);
        assert_eq!(files[0].filename, "new_file.rs");
        assert_eq!(files[0].patch.as_deref().unwrap().lines().count(), 4);
    }

    #[test]
    fn parse_deleted_file_uses_old_path() {
        let diff = r#"diff --git a/old_file.rs b/old_file.rs
deleted file mode 100644
index 1234567..0000000
--- a/old_file.rs
+++ /dev/null
@@ -1,2 +0,0 @@
-fn old() {
-}
"#;
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, FileStatus::Removed);
        assert_eq!(files[0].filename, "old_file.rs");
        assert!(files[0].is_removed());
    }

    #[test]
    fn parse_multiple_files() {
        let diff = r#"diff --git a/a.rs b/a.rs
index 1234567..abcdefg 100644
--- a/a.rs
+++ b/a.rs
@@ -1,3 +1,3 @@
 fn a() {
-    1
+    2
 }
diff --git a/b.rs b/b.rs
index 1234567..abcdefg 100644
--- a/b.rs
+++ b/b.rs
@@ -1,3 +1,3 @@
 fn b() {
-    3
+    4
 }
"#;
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].filename, "a.rs");
        assert_eq!(files[1].filename, "b.rs");
        assert!(!files[0].patch.as_deref().unwrap().contains("fn b()"));
    }

    #[test]
    fn parse_rename() {
        let diff = r#"diff --git a/old_name.rs b/new_name.rs
similarity index 95%
rename from old_name.rs
rename to new_name.rs
index 1234567..abcdefg 100644
--- a/old_name.rs
+++ b/new_name.rs
@@ -1,3 +1,3 @@
 fn renamed() {
-    old()
+    new()
 }
"#;
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, FileStatus::Renamed);
        assert_eq!(files[0].filename, "new_name.rs");
    }

    #[test]
    fn pure_rename_has_no_patch() {
        let diff = "diff --git a/x.rs b/y.rs\nsimilarity index 100%\nrename from x.rs\nrename to y.rs\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files[0].status, FileStatus::Renamed);
        assert!(files[0].patch.is_none());
    }

    #[test]
    fn parse_empty_diff() {
        assert!(parse_unified_diff("").is_empty());
    }

    #[test]
    fn parse_binary_file() {
        let diff = r#"diff --git a/image.png b/image.png
new file mode 100644
index 0000000..1234567
Binary files /dev/null and b/image.png differ
"#;
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].status, FileStatus::Added);
        assert!(files[0].patch.is_none());
    }

    #[test]
    fn hunk_lines_resembling_headers_stay_in_patch() {
        let diff = "diff --git a/notes.md b/notes.md\nindex 1..2 100644\n--- a/notes.md\n+++ b/notes.md\n@@ -1 +1,2 @@\n keep\n+new file mode is just text here\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files[0].status, FileStatus::Modified);
        assert!(files[0].patch.as_deref().unwrap().contains("+new file mode"));
    }

    #[test]
    fn no_newline_marker_is_kept() {
        let diff = "diff --git a/test.rs b/test.rs\nindex 1234567..abcdefg 100644\n--- a/test.rs\n+++ b/test.rs\n@@ -1,2 +1,2 @@\n-old line\n+new line\n\\ No newline at end of file\n";
        let files = parse_unified_diff(diff);
        assert!(files[0].patch.as_deref().unwrap().contains("\\ No newline"));
    }

    #[test]
    fn parse_mnemonic_prefix_cw() {
        // diff.mnemonicPrefix: c/ = commit, w/ = working tree
        let diff = "diff --git c/auth.rs w/auth.rs\nindex 1234567..abcdefg 100644\n--- c/auth.rs\n+++ w/auth.rs\n@@ -1,2 +1,3 @@\n fn main() {\n+    todo!();\n }\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].filename, "auth.rs");
    }

    #[test]
    fn parse_path_with_spaces() {
        let diff = "diff --git a/my dir/file.ts b/my dir/file.ts\nindex 1..2 100644\n@@ -1 +1 @@\n-a\n+b\n";
        let files = parse_unified_diff(diff);
        assert_eq!(files[0].filename, "my dir/file.ts");
    }

    #[test]
    fn strip_diff_prefix_all_variants() {
        assert_eq!(strip_diff_prefix("a/file.rs"), "file.rs");
        assert_eq!(strip_diff_prefix("b/file.rs"), "file.rs");
        assert_eq!(strip_diff_prefix("c/file.rs"), "file.rs");
        assert_eq!(strip_diff_prefix("w/file.rs"), "file.rs");
        assert_eq!(strip_diff_prefix("i/file.rs"), "file.rs");
        assert_eq!(strip_diff_prefix("o/file.rs"), "file.rs");
        // Should not strip unknown prefixes
        assert_eq!(strip_diff_prefix("x/file.rs"), "x/file.rs");
        assert_eq!(strip_diff_prefix("src/file.rs"), "src/file.rs");
        assert_eq!(strip_diff_prefix("a"), "a");
        assert_eq!(strip_diff_prefix(""), "");
    }
}
