//! # Password Hashing
//!
//! One-way bcrypt digests with a fixed cost parameter. Verification is
//! the only way back: the digest is never decoded, and a verification
//! failure of any kind (including a corrupt stored digest) reads as a
//! mismatch.

use stockroom_core::DomainError;

/// Fixed bcrypt cost. Raising it invalidates no existing digest — bcrypt
/// embeds the cost — but slows new registrations.
pub const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password.
pub fn hash(plain: &str) -> Result<String, DomainError> {
    bcrypt::hash(plain, BCRYPT_COST)
        .map_err(|e| DomainError::Internal(format!("password hashing failed: {e}")))
}

/// Verify a plaintext password against a stored digest. Fails closed:
/// a malformed digest is a mismatch, not an error.
pub fn verify(plain: &str, digest: &str) -> bool {
    bcrypt::verify(plain, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify_round_trips() {
        let digest = hash("password123").unwrap();
        assert!(verify("password123", &digest));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let digest = hash("password123").unwrap();
        assert!(!verify("password124", &digest));
        assert!(!verify("", &digest));
    }

    #[test]
    fn test_digest_is_not_plaintext_and_is_salted() {
        let a = hash("password123").unwrap();
        let b = hash("password123").unwrap();
        assert!(!a.contains("password123"));
        assert_ne!(a, b, "bcrypt salts every digest");
    }

    #[test]
    fn test_corrupt_digest_is_a_mismatch_not_a_panic() {
        assert!(!verify("password123", "not-a-bcrypt-digest"));
        assert!(!verify("password123", ""));
    }
}
