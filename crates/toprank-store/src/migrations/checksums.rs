//! Checksums detect edits to migrations that were already applied

use sha2::{Digest, Sha256};

/// Hex-encoded SHA256 of the migration SQL
pub fn compute_checksum(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
