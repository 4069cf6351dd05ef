//! Password hashing.
//!
//! SHA-256 over the UTF-8 password, uppercase hex. Matches the hashes already
//! stored by earlier deployments, so the scheme cannot change without a
//! migration.

use sha2::{Digest, Sha256};

pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        out.push_str(&format!("{byte:02X}"));
    }
    out
}

/// Constant-shape comparison of a candidate password against a stored hash.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}
