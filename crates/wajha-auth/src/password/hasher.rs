//! scrypt password hashing and constant-time verification.
//!
//! Stored form is `<derived-key-hex>.<salt-hex>` — a 64-byte derived key
//! and a random 16-byte salt, both hex-encoded, dot-separated.

use rand::RngCore;
use scrypt::{Params, scrypt};
use subtle::ConstantTimeEq;

use wajha_core::config::auth::AuthConfig;
use wajha_core::error::AppError;
use wajha_core::result::AppResult;

const KEY_LEN: usize = 64;
const SALT_LEN: usize = 16;

/// Handles password hashing and verification using scrypt.
///
/// Both operations are deliberately CPU-expensive; async callers must use
/// the `*_offloaded` wrappers so the derivation runs on the blocking pool
/// instead of stalling unrelated request handling.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    log_n: u8,
    r: u32,
    p: u32,
}

impl PasswordHasher {
    /// Creates a hasher with the configured cost parameters.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            log_n: config.scrypt_log_n,
            r: config.scrypt_r,
            p: config.scrypt_p,
        }
    }

    fn params(&self) -> AppResult<Params> {
        Params::new(self.log_n, self.r, self.p, KEY_LEN)
            .map_err(|e| AppError::internal(format!("Invalid scrypt parameters: {e}")))
    }

    /// Hashes a plaintext password with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> AppResult<String> {
        let mut salt = [0u8; SALT_LEN];
        rand::rng().fill_bytes(&mut salt);

        let mut key = [0u8; KEY_LEN];
        scrypt(password.as_bytes(), &salt, &self.params()?, &mut key)
            .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

        Ok(format!("{}.{}", hex::encode(key), hex::encode(salt)))
    }

    /// Verifies a plaintext password against a stored form.
    ///
    /// Returns `Ok(true)` if the password matches, `Ok(false)` if not.
    /// A malformed stored form (missing separator, bad hex, wrong key
    /// length) is an authentication failure, never an error or a panic.
    pub fn verify_password(&self, password: &str, stored: &str) -> AppResult<bool> {
        let Some((key_hex, salt_hex)) = stored.split_once('.') else {
            return Ok(false);
        };
        let Ok(stored_key) = hex::decode(key_hex) else {
            return Ok(false);
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return Ok(false);
        };
        if stored_key.len() != KEY_LEN || salt.is_empty() {
            return Ok(false);
        }

        let mut derived = [0u8; KEY_LEN];
        scrypt(password.as_bytes(), &salt, &self.params()?, &mut derived)
            .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

        // Constant-time comparison; structural equality would leak the
        // position of the first differing byte.
        Ok(derived.ct_eq(stored_key.as_slice()).into())
    }

    /// [`Self::hash_password`] on the blocking pool.
    pub async fn hash_offloaded(&self, password: String) -> AppResult<String> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.hash_password(&password))
            .await
            .map_err(|e| AppError::internal(format!("Hashing task failed: {e}")))?
    }

    /// [`Self::verify_password`] on the blocking pool.
    pub async fn verify_offloaded(&self, password: String, stored: String) -> AppResult<bool> {
        let hasher = self.clone();
        tokio::task::spawn_blocking(move || hasher.verify_password(&password, &stored))
            .await
            .map_err(|e| AppError::internal(format!("Verification task failed: {e}")))?
    }
}
