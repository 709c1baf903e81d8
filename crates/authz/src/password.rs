//! Salted password digests stored as `salt$digest` hex pairs.

use rand::RngCore;
use sha2::{Digest, Sha256};

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt_hex = hex::encode(salt);
    let digest = digest_with_salt(&salt_hex, password);
    format!("{salt_hex}${digest}")
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, digest)) => digest_with_salt(salt, password) == digest,
        None => false,
    }
}

fn digest_with_salt(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Digest of a session token as persisted in the sessions table; the raw
/// token never touches the store.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let stored = hash_password("Fr33d0m!");
        assert!(verify_password("Fr33d0m!", &stored));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let stored = hash_password("Fr33d0m!");
        assert!(!verify_password("fr33d0m!", &stored));
    }

    #[test]
    fn malformed_stored_value_is_rejected() {
        assert!(!verify_password("anything", "no-separator-here"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("same-password");
        let b = hash_password("same-password");
        assert_ne!(a, b);
    }

    #[test]
    fn token_digest_is_stable() {
        assert_eq!(token_digest("abc"), token_digest("abc"));
        assert_ne!(token_digest("abc"), token_digest("abd"));
    }
}
