//! The fixed YAML frontmatter that Cursor needs to auto-apply a `.mdc` rules file.
//!
//! Invariant for frontmatter-bearing formats: the block occupies lines 1..=5
//! and appears exactly once.

use crate::agent::OutputFormat;

pub const DELIMITER: &str = "---";
pub const ALWAYS_APPLY: &str = "alwaysApply: true";

/// The five lines, in order.
pub const LINES: [&str; 5] = [
    DELIMITER,
    "description: Project Development Guidelines",
    "globs: [\"**/*\"]",
    ALWAYS_APPLY,
    DELIMITER,
];

/// How far down the closing delimiter may sit for a leading block to count
/// as frontmatter.
pub const MAX_SCAN_LINES: usize = 20;

/// The block as text, each line newline-terminated.
pub fn block() -> String {
    let mut out = String::new();
    for line in LINES {
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Byte offset just past the exact block if `content` opens with it.
fn exact_block_end(content: &str) -> Option<usize> {
    let mut lines = content.split_inclusive('\n');
    let mut offset = 0;
    for expected in LINES {
        let line = lines.next()?;
        if line.trim_end_matches(['\n', '\r']) != expected {
            return None;
        }
        offset += line.len();
    }
    Some(offset)
}

fn skip_blank_lines(content: &str) -> &str {
    let mut offset = 0;
    for line in content.split_inclusive('\n') {
        if !line.trim().is_empty() {
            break;
        }
        offset += line.len();
    }
    &content[offset..]
}

/// Drop exact copies of the block at the start of `rest`, blank lines between
/// them included. `None` if there were none.
fn strip_repeated_blocks(rest: &str) -> Option<&str> {
    let mut body = skip_blank_lines(rest);
    let mut stripped = false;
    while let Some(end) = exact_block_end(body) {
        body = skip_blank_lines(&body[end..]);
        stripped = true;
    }
    stripped.then_some(body)
}

/// Byte offset just past a leading frontmatter-like block and the single blank
/// line after it, if `content` opens with one.
fn leading_block_end(content: &str) -> Option<usize> {
    let mut offset = 0;
    let mut iter = content.split_inclusive('\n');

    let first = iter.next()?;
    if first.trim_end() != DELIMITER {
        return None;
    }
    offset += first.len();

    for (i, line) in iter.by_ref().enumerate() {
        // Line 1 was the opener; the closer must land within MAX_SCAN_LINES.
        if i + 2 > MAX_SCAN_LINES {
            return None;
        }
        offset += line.len();
        if line.trim_end() == DELIMITER {
            if let Some(next) = content[offset..].split_inclusive('\n').next() {
                if next.trim().is_empty() {
                    offset += next.len();
                }
            }
            return Some(offset);
        }
    }
    None
}

/// Make sure `content` carries the frontmatter block exactly when `format`
/// needs it.
///
/// Formats without frontmatter pass through untouched. For `.mdc`:
/// an exact leading block is left alone, a different leading block is
/// replaced, and anything else gets the block plus a blank line prepended.
/// Exact copies stacked under the leading block are collapsed into one.
pub fn ensure(content: &str, format: OutputFormat) -> String {
    if !format.requires_frontmatter() {
        return content.to_string();
    }

    let rest = match exact_block_end(content) {
        Some(end) => match strip_repeated_blocks(&content[end..]) {
            Some(body) => body,
            None => return content.to_string(),
        },
        None => match leading_block_end(content) {
            Some(end) => {
                let after = &content[end..];
                strip_repeated_blocks(after).unwrap_or(after)
            }
            None => content,
        },
    };

    let mut out = block();
    out.push('\n');
    out.push_str(rest);
    out
}

/// Caller-side post-condition: `alwaysApply: true` once, delimiter on line 1.
pub fn satisfies_invariant(content: &str) -> bool {
    content.matches(ALWAYS_APPLY).count() == 1
        && content.lines().next() == Some(DELIMITER)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
