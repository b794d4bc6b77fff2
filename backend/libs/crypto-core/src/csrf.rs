//! CSRF double-submit tokens
//!
//! The server hands out a random token, the client echoes it back both as a
//! cookie and as a header. A request is accepted only if both copies match.

use rand::{rngs::OsRng, RngCore};

/// Token length in random bytes (hex-encoded to twice this many chars)
pub const TOKEN_BYTES: usize = 32;

/// Generate a new random token, hex encoded
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Compare the cookie and header copies in constant time.
///
/// Empty tokens never match.
pub fn tokens_match(cookie: &str, header: &str) -> bool {
    let a = cookie.as_bytes();
    let b = header.as_bytes();
    if a.is_empty() || a.len() != b.len() {
        return false;
    }

    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tokens_are_unique_hex() {
        let a = generate_token();
        let b = generate_token();
        assert_eq!(a.len(), TOKEN_BYTES * 2);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }

    #[test]
    fn test_tokens_match() {
        let token = generate_token();
        assert!(tokens_match(&token, &token.clone()));
    }

    #[test]
    fn test_tokens_mismatch() {
        assert!(!tokens_match("abcd", "abce"));
        assert!(!tokens_match("abcd", "abc"));
        assert!(!tokens_match("", ""));
    }
}
