//! Identifier-derived names for assets whose URL carries no usable segment.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the digest when deriving a name.
pub const DERIVED_NAME_LEN: usize = 16;

/// Full SHA-256 hex digest of a resource identifier.
pub fn identifier_digest(id: &str) -> String {
    hex::encode(Sha256::digest(id.as_bytes()))
}

/// Short, stable filename stem derived from a resource identifier.
pub fn derived_stem(id: &str) -> String {
    let mut digest = identifier_digest(id);
    digest.truncate(DERIVED_NAME_LEN);
    digest
}
