//! Stable, backend-safe names derived from opaque workspace and connection IDs.
//!
//! Both functions are pure. The same raw ID always yields the same name, so a
//! later get or delete invocation can find what an earlier create made without
//! any stored ID-to-name mapping.

/// Leading letter so the name is a legal identifier on backends that reject
/// names starting with a digit.
pub const IDENTIFIER_PREFIX: char = 'd';

/// Maximum length, in bytes, of a normalized identifier.
pub const MAX_IDENTIFIER_LEN: usize = 64;

/// Length of the textual MD5 digest, and so the longest username derivable.
pub const MAX_USERNAME_LEN: usize = 32;

/// Username length used by the connection operations unless configured otherwise.
pub const DEFAULT_USERNAME_LEN: usize = 16;

const FORBIDDEN_CHARS: [char; 3] = ['-', '`', ';'];

/// Derive the workspace/database/container name for `raw_id`.
///
/// Two raw IDs that share their first 64 normalized bytes collide.
pub fn normalize_identifier(raw_id: &str) -> String {
    let mut name = String::with_capacity(raw_id.len() + 1);
    name.push(IDENTIFIER_PREFIX);
    name.extend(raw_id.chars().filter(|c| !FORBIDDEN_CHARS.contains(c)));
    truncate_at_char_boundary(&mut name, MAX_IDENTIFIER_LEN);
    name
}

/// Derive the backend username for a connection.
///
/// The result is the hex MD5 digest of `connection_id`, reduced to ASCII
/// alphanumerics and cut to `max_length` (capped at [`MAX_USERNAME_LEN`]).
pub fn derive_username(connection_id: &str, max_length: usize) -> String {
    let digest = format!("{:x}", md5::compute(connection_id.as_bytes()));
    digest
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(max_length)
        .collect()
}

fn truncate_at_char_boundary(value: &mut String, max_len: usize) {
    if value.len() <= max_len {
        return;
    }
    let mut cut = max_len;
    while !value.is_char_boundary(cut) {
        cut -= 1;
    }
    value.truncate(cut);
}
