//! Text helpers for rendering script lines.

use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const ELLIPSIS: char = '…';

/// Truncates to `max_width` terminal columns, ending with `…` when cut.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> Cow<'_, str> {
    if text.width() <= max_width {
        return Cow::Borrowed(text);
    }
    if max_width == 0 {
        return Cow::Borrowed("");
    }

    let budget = max_width - 1;
    let mut used = 0;
    let mut out = String::with_capacity(max_width + ELLIPSIS.len_utf8());
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    Cow::Owned(out)
}

/// Makes script text safe to draw: drops escape bytes and expands tabs.
///
/// Scripts are user-authored, so an embedded `\x1b[...` must not reach the
/// terminal as a live escape sequence.
pub fn sanitize_for_display(s: &str) -> Cow<'_, str> {
    if s.chars().any(|c| c == '\t' || c.is_control()) {
        Cow::Owned(
            s.chars()
                .filter_map(|c| match c {
                    '\t' => Some("    ".to_string()),
                    c if c.is_control() => None,
                    c => Some(c.to_string()),
                })
                .collect(),
        )
    } else {
        Cow::Borrowed(s)
    }
}
