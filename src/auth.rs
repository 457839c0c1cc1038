//! Password hashing.
//!
//! Stored form is `<salt>$<hex digest>` where the digest is HMAC-SHA-256 of
//! the password keyed by the per-user random salt.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use uuid::Uuid;

type HmacSha256 = Hmac<Sha256>;

/// Hash `password` under a fresh random salt.
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    let digest = digest(&salt, password);
    format!("{salt}${digest}")
}

/// Check `password` against a stored `<salt>$<digest>` string.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, expected)) => digest(salt, password) == expected,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC accepts any key length");
    mac.update(password.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_not_the_password() {
        let hash = hash_password("secret");
        assert_ne!(hash, "secret");
        assert!(!hash.contains("secret"));
    }

    #[test]
    fn verify_accepts_correct_password() {
        let hash = hash_password("secret");
        assert!(verify_password("secret", &hash));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hash = hash_password("secret");
        assert!(!verify_password("hunter2", &hash));
        assert!(!verify_password("secret", "garbage-without-separator"));
    }

    #[test]
    fn salts_differ_between_hashes() {
        assert_ne!(hash_password("secret"), hash_password("secret"));
    }
}
