use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a library finding.
///
/// Identity fields:
/// - check_id
/// - code
/// - library (canonical id)
/// - manifest paths involved, in the order given
pub fn fingerprint_for_library(
    check_id: &str,
    code: &str,
    library: &str,
    manifests: &[&str],
) -> String {
    let mut parts = vec![check_id, code, library];
    parts.extend_from_slice(manifests);
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
