//! Comment stripping ahead of pattern matching.
//!
//! Comments are removed but their newlines are kept, so line-anchored
//! patterns still see the original line structure. String literals are
//! copied through untouched (a `//` inside `"http://…"` is not a comment)
//! and their spans are recorded, so callers can tell statements from text
//! that merely looks like one. Python triple-quoted strings are docstrings
//! in practice and are removed like comments.

use std::ops::Range;

/// Lexical comment syntax of one language.
#[derive(Debug, Clone, Copy)]
pub(crate) struct CommentSyntax {
    pub line: &'static str,
    pub block: Option<(&'static str, &'static str)>,
    pub nested_blocks: bool,
    pub quotes: &'static [char],
    /// Quotes whose literals may span lines.
    pub multiline_quotes: &'static [char],
    pub strip_triple_quoted: bool,
}

/// Comment-free source text plus the string literals left in it.
#[derive(Debug, Default)]
pub(crate) struct Stripped {
    pub text: String,
    /// Byte ranges of string literals in `text`, ascending and disjoint.
    pub strings: Vec<Range<usize>>,
}

impl Stripped {
    /// Whether byte `pos` of `text` lies inside a string literal.
    pub fn in_string(&self, pos: usize) -> bool {
        let i = self.strings.partition_point(|r| r.end <= pos);
        self.strings.get(i).is_some_and(|r| r.start <= pos)
    }
}

const TRIPLE_QUOTES: [&str; 2] = ["\"\"\"", "'''"];

/// Remove comments (and, where configured, triple-quoted strings) from `source`.
pub(crate) fn strip_comments(source: &str, syntax: &CommentSyntax) -> Stripped {
    let mut out = Stripped {
        text: String::with_capacity(source.len()),
        strings: Vec::new(),
    };
    let mut i = 0;

    while i < source.len() {
        let rest = &source[i..];

        if syntax.strip_triple_quoted {
            if let Some(quote) = TRIPLE_QUOTES.iter().find(|q| rest.starts_with(**q)) {
                let body = i + quote.len();
                let end = source[body..]
                    .find(quote)
                    .map(|p| body + p + quote.len())
                    .unwrap_or(source.len());
                push_newlines(&mut out.text, &source[i..end]);
                i = end;
                continue;
            }
        }

        if rest.starts_with(syntax.line) {
            // The newline itself is kept by the next iteration.
            i = rest.find('\n').map(|p| i + p).unwrap_or(source.len());
            continue;
        }

        if let Some((open, close)) = syntax.block {
            if rest.starts_with(open) {
                let end = block_end(source, i + open.len(), open, close, syntax.nested_blocks);
                out.text.push(' ');
                push_newlines(&mut out.text, &source[i..end]);
                i = end;
                continue;
            }
        }

        let Some(c) = rest.chars().next() else { break };
        if syntax.quotes.contains(&c) && !is_char_literal(source, i) {
            let multiline = syntax.multiline_quotes.contains(&c);
            let end = string_end(source, i + c.len_utf8(), c, multiline);
            let start = out.text.len();
            out.text.push_str(&source[i..end]);
            out.strings.push(start..out.text.len());
            i = end;
            continue;
        }

        out.text.push(c);
        i += c.len_utf8();
    }

    out
}

/// Whether the quote at `i` is the body of a char literal such as `'"'`.
fn is_char_literal(source: &str, i: usize) -> bool {
    let before = &source[..i];
    (before.ends_with('\'') || before.ends_with("'\\"))
        && source[i + 1..].starts_with('\'')
}

/// Byte index just past the block comment whose body starts at `from`.
fn block_end(source: &str, from: usize, open: &str, close: &str, nested: bool) -> usize {
    let mut depth = 1usize;
    let mut j = from;
    while j < source.len() {
        let rest = &source[j..];
        if rest.starts_with(close) {
            depth -= 1;
            j += close.len();
            if depth == 0 {
                return j;
            }
        } else if nested && rest.starts_with(open) {
            depth += 1;
            j += open.len();
        } else {
            j += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    source.len()
}

/// Byte index just past the string literal whose body starts at `from`.
///
/// Unless `multiline`, a literal ends at an unescaped newline so an
/// unterminated one cannot swallow the rest of the file.
fn string_end(source: &str, from: usize, quote: char, multiline: bool) -> usize {
    let mut chars = source[from..].char_indices();
    while let Some((offset, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '\n' if !multiline => return from + offset,
            c if c == quote => return from + offset + c.len_utf8(),
            _ => {}
        }
    }
    source.len()
}

fn push_newlines(out: &mut String, removed: &str) {
    out.extend(removed.chars().filter(|c| *c == '\n'));
}
