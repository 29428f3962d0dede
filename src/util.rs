//! Small shared helpers

/// Minimum length of a content hash accepted in strict mode
pub const MIN_HASH_LENGTH: usize = 8;

/// A plausible content hash: at least 8 characters, all hexadecimal
pub fn is_valid_hash(value: &str) -> bool {
    value.len() >= MIN_HASH_LENGTH && value.chars().all(|c| c.is_ascii_hexdigit())
}

/// First `n` characters of `s`, respecting char boundaries
pub fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
