//! Trailing-comma repair for hand-edited settings files.

use std::borrow::Cow;

/// Remove commas that directly precede a closing `]` or `}`.
///
/// Whitespace between the comma and the bracket is allowed and kept.
/// Commas inside string literals are never touched. Returns
/// `Cow::Borrowed` when nothing needed removing.
pub(super) fn strip_trailing_commas(source: &str) -> Cow<'_, str> {
    let bytes = source.as_bytes();
    let mut dropped = Vec::new();
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b',' if closes_next(&bytes[i + 1..]) => dropped.push(i),
            _ => {}
        }
    }

    if dropped.is_empty() {
        return Cow::Borrowed(source);
    }

    // Every dropped index is an ASCII comma, so slicing stays on char boundaries.
    let mut fixed = String::with_capacity(source.len() - dropped.len());
    let mut start = 0;
    for i in dropped {
        fixed.push_str(&source[start..i]);
        start = i + 1;
    }
    fixed.push_str(&source[start..]);
    Cow::Owned(fixed)
}

/// Whether the next non-whitespace byte closes an array or object.
fn closes_next(rest: &[u8]) -> bool {
    rest.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b']' || b == b'}')
}
