//! Log sanitization for operator-supplied strings.
//!
//! Destination ids, anchor names, and area ids come from seed files and
//! host scene graphs; escaping keeps a hostile or malformed name from
//! splitting a log line or embedding control sequences.

/// Escape a string for single-line logging. Control characters are
/// rendered via their debug escapes, and anything past `MAX_PREVIEW`
/// characters is dropped with an ellipsis to cap log noise.
pub fn escape_log(s: &str) -> String {
    const MAX_PREVIEW: usize = 120;
    let mut out = String::with_capacity(s.len().min(MAX_PREVIEW) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= MAX_PREVIEW {
            out.push('…');
            break;
        }
        if ch == ' ' || (!ch.is_control() && !ch.is_whitespace()) {
            out.push(ch);
        } else {
            out.extend(ch.escape_default());
        }
    }
    out
}
