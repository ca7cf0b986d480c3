//! Logging helpers that keep user-supplied text (player commands, save
//! labels, cipher messages) on a single log line.

/// Default preview length for logged user text.
pub const MAX_PREVIEW: usize = 120;

/// Escape `s` for single-line logging, truncated to [`MAX_PREVIEW`] characters.
pub fn escape_log(s: &str) -> String {
    escape_log_with_limit(s, MAX_PREVIEW)
}

/// Escape `s` for single-line logging:
/// backslash, `\n`, `\r` and `\t` become two-character escapes, other control
/// characters become `\xNN`. Input past `limit` characters is replaced by `…`.
pub fn escape_log_with_limit(s: &str, limit: usize) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(s.len().min(limit) + 4);
    for (count, ch) in s.chars().enumerate() {
        if count >= limit {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(&mut out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}
