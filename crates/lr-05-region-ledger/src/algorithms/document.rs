//! Document hash validation.

use shared_types::RegistryError;

/// Shortest accepted hash (128-bit digest in hex).
pub const MIN_DOCUMENT_HASH_LEN: usize = 32;

/// Trim and lower-case a hex document hash, rejecting anything else.
pub fn normalize_document_hash(raw: &str) -> Result<String, RegistryError> {
    let hash = raw.trim();
    let invalid = |reason: &str| RegistryError::InvalidDocumentHash {
        hash: raw.to_string(),
        reason: reason.to_string(),
    };
    if hash.len() < MIN_DOCUMENT_HASH_LEN {
        return Err(invalid("shorter than 32 hex characters"));
    }
    if !hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("not hexadecimal"));
    }
    Ok(hash.to_ascii_lowercase())
}
