use sha2::{Digest, Sha256};

/// Lower-case hex SHA-256 digest
pub fn sha256_hex(input: &[u8]) -> String {
    hex::encode(Sha256::digest(input))
}

/// First 12 hex chars of the digest. Identifies which secret a process
/// runs with in startup logs without revealing it.
pub fn fingerprint(secret: &[u8]) -> String {
    let mut digest = sha256_hex(secret);
    digest.truncate(12);
    digest
}
