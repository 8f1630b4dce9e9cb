//! Text utilities for positions and indentation.
//!
//! Two families of helpers:
//!
//! - **Positions**: byte offsets to 1-indexed line:column, used to report
//!   where a template snippet failed to compile
//! - **Indentation**: reading and rewriting the leading whitespace carried
//!   by syntax-tree prefixes, used to format synthesized code so it matches
//!   its surroundings
//!
//! ## Coordinate Conventions
//!
//! - Lines and columns are **1-indexed** (matching editor conventions)
//! - Byte offsets are **0-indexed**
//! - Columns count Unicode scalar values, not bytes

// ============================================================================
// Positions
// ============================================================================

/// Convert a byte offset to 1-indexed line and column (Unicode-aware).
///
/// If `offset` exceeds the content length, returns the position at the end
/// of the content.
pub fn byte_offset_to_position_str(content: &str, offset: usize) -> (u32, u32) {
    let mut line = 1u32;
    let mut col = 1u32;
    let mut current_offset = 0usize;

    for ch in content.chars() {
        if current_offset >= offset {
            break;
        }
        if ch == '\n' {
            line += 1;
            col = 1;
        } else {
            col += 1;
        }
        current_offset += ch.len_utf8();
    }

    (line, col)
}

// ============================================================================
// Indentation
// ============================================================================

/// Indentation of one line.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IndentInfo {
    /// The actual indentation string (spaces/tabs)
    pub indent_str: String,
    /// The visual width (assuming 4-space tabs)
    pub visual_width: usize,
    /// Whether the indent uses tabs
    pub uses_tabs: bool,
}

impl IndentInfo {
    /// Describe an indentation string.
    pub fn of(indent: &str) -> Self {
        IndentInfo {
            indent_str: indent.to_string(),
            visual_width: indent.chars().map(|c| if c == '\t' { 4 } else { 1 }).sum(),
            uses_tabs: indent.contains('\t'),
        }
    }
}

/// The indentation after the last newline of a whitespace run.
///
/// Returns `None` when the whitespace contains no newline, i.e. the token it
/// precedes continues the current line.
pub fn last_line_indent(whitespace: &str) -> Option<&str> {
    whitespace.rfind('\n').map(|i| {
        let tail = &whitespace[i + 1..];
        let end = tail
            .char_indices()
            .find(|(_, c)| !(*c == ' ' || *c == '\t'))
            .map(|(i, _)| i)
            .unwrap_or(tail.len());
        &tail[..end]
    })
}

/// Move every line of a whitespace run from one base indentation to another.
///
/// Text before the first newline is kept. For each later line, a leading
/// `from` is swapped for `to`; lines that do not start with `from` get `to`
/// prepended, so relative nesting survives the move.
pub fn shift_indentation(whitespace: &str, from: &str, to: &str) -> String {
    if !whitespace.contains('\n') {
        return whitespace.to_string();
    }

    let mut result = String::with_capacity(whitespace.len() + to.len());
    let mut first_line = true;

    for line in whitespace.split_inclusive('\n') {
        if first_line {
            result.push_str(line);
            first_line = false;
            continue;
        }
        result.push_str(to);
        result.push_str(line.strip_prefix(from).unwrap_or(line));
    }

    // A trailing newline leaves an empty last line that still needs indenting.
    if whitespace.ends_with('\n') {
        result.push_str(to);
    }

    result
}

/// Guess one level of indentation from an outer and an inner indent.
///
/// Falls back to a tab when the outer indent uses tabs, otherwise to four
/// spaces.
pub fn indent_unit(outer: &str, inner: &str) -> String {
    match inner.strip_prefix(outer) {
        Some(unit) if !unit.is_empty() => unit.to_string(),
        _ if outer.contains('\t') => "\t".to_string(),
        _ => "    ".to_string(),
    }
}
