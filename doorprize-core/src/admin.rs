//! Optional organiser password that gates destructive roster commands.
//!
//! Credentials are stored as `"<salt>:<sha256(salt || password)>"`, both hex.

use crate::error::{DoorprizeError, Result};
use sha2::{Digest, Sha256};

pub fn hash_password(password: &str) -> String {
    let salt = hex::encode(uuid::Uuid::new_v4().as_bytes());
    let digest = salted_digest(&salt, password);
    format!("{}:{}", salt, digest)
}

/// Fails with `AdminRejected` unless `password` matches `credential`.
pub fn verify_password(password: &str, credential: &str) -> Result<()> {
    let (salt, expected) = credential
        .split_once(':')
        .ok_or_else(|| DoorprizeError::config("malformed admin password hash"))?;

    if salted_digest(salt, password) == expected {
        Ok(())
    } else {
        Err(DoorprizeError::AdminRejected)
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let credential = hash_password("sesame");
        verify_password("sesame", &credential).unwrap();

        assert!(matches!(
            verify_password("Sesame", &credential),
            Err(DoorprizeError::AdminRejected)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("sesame"), hash_password("sesame"));
    }

    #[test]
    fn test_malformed_credential_is_a_config_error() {
        assert!(matches!(
            verify_password("sesame", "not-a-credential"),
            Err(DoorprizeError::Config(_))
        ));
    }
}
