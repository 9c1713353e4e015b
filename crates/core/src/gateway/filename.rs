//! Upload filename sanitization.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use unicode_normalization::UnicodeNormalization;

static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9._-]").unwrap());

/// Reduces a client-supplied filename to a safe basename.
///
/// Directory components are dropped and accented letters are folded to their
/// ASCII base. Whitespace becomes `_`, anything outside `[A-Za-z0-9._-]` is
/// removed and leading/trailing `.` or `_` are trimmed.
/// Returns `None` when nothing usable remains.
pub fn sanitize_filename(name: &str) -> Option<String> {
    let base = name.rsplit(['/', '\\']).next().unwrap_or_default();
    let spaced: String = base
        .nfkd()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(char::is_ascii)
        .collect();
    let cleaned = DISALLOWED.replace_all(&spaced, "");
    let trimmed = cleaned.trim_matches(['.', '_']);

    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
