//! Secret hashing utilities

use bcrypt::{hash, verify};

pub use bcrypt::DEFAULT_COST;

/// Cost range bcrypt accepts; the crate keeps its own bounds private.
pub const MIN_COST: u32 = 4;
pub const MAX_COST: u32 = 31;

/// Hash a listing secret using bcrypt
pub fn hash_secret(secret: &str, cost: u32) -> Result<String, bcrypt::BcryptError> {
    hash(secret, cost)
}

/// Verify a secret against a stored hash. A malformed hash never matches.
pub fn verify_secret(secret: &str, hash: &str) -> bool {
    verify(secret, hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_secret_verifies() {
        let hashed = hash_secret("open sesame", MIN_COST).unwrap();
        assert_ne!(hashed, "open sesame");
        assert!(verify_secret("open sesame", &hashed));
        assert!(!verify_secret("open says me", &hashed));
    }

    #[test]
    fn cost_bounds_match_bcrypt() {
        assert!(hash_secret("x", MIN_COST - 1).is_err());
        assert!(hash_secret("x", MAX_COST + 1).is_err());
    }

    #[test]
    fn malformed_hash_does_not_match() {
        assert!(!verify_secret("anything", "not-a-bcrypt-hash"));
    }
}
