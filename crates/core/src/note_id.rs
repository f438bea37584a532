//! Compact URL form of note ids.
//!
//! Notes are keyed by UUID; URLs carry the 16 raw bytes as unpadded
//! base64url (22 characters) instead of the hyphenated form.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::distr::{Alphanumeric, SampleString};
use uuid::Uuid;

/// Length of generated short ids.
pub const SHORT_ID_LENGTH: usize = 10;

/// Encode a note id for use in URLs.
pub fn encode_note_id(id: Uuid) -> String {
    URL_SAFE_NO_PAD.encode(id.as_bytes())
}

/// Decode a URL note id. Returns `None` for anything that is not exactly 16
/// base64url-encoded bytes.
pub fn decode_note_id(encoded: &str) -> Option<Uuid> {
    let bytes = URL_SAFE_NO_PAD.decode(encoded).ok()?;
    Uuid::from_slice(&bytes).ok()
}

/// Generate a random short id for public share links.
pub fn generate_short_id() -> String {
    Alphanumeric.sample_string(&mut rand::rng(), SHORT_ID_LENGTH)
}

/// Whether `alias` may be used as a free-URL note alias.
///
/// Aliases share the URL namespace with encoded ids and fixed routes, so they
/// must be a single path segment of safe characters.
pub fn is_valid_alias(alias: &str) -> bool {
    const RESERVED: &[&str] = &["new", "s", "p", "status", "health", "realtime", "user", "api"];

    !alias.is_empty()
        && alias.len() <= 128
        && !RESERVED.contains(&alias)
        && alias
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && !alias.starts_with('.')
}
