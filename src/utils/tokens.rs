//! One-time token generation for email verification and password reset.
//!
//! Tokens are opaque random hex strings. They live in Redis under the
//! `auth:verify:` / `auth:reset:` key namespaces with explicit TTLs and
//! are deleted when consumed, so they survive restarts and work across
//! multiple server instances.

use rand::RngCore;

/// Byte length of generated tokens (48 hex characters).
const TOKEN_BYTES: usize = 24;

/// Generates a random opaque token.
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_hex_of_expected_length() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }
}
