//! Content-addressed validators for cached entries.

use sha2::{Digest, Sha256};

/// Compute a strong `ETag` value for `content`.
///
/// The tag is the first 16 bytes of the SHA-256 digest, hex encoded and quoted.
pub fn compute_etag(content: &[u8]) -> String {
    let digest = Sha256::digest(content);
    format!("\"{}\"", hex::encode(&digest[..16]))
}
