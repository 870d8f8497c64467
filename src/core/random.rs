//! Cryptographically secure random key material.

use rand_core::{OsRng, TryRngCore};

use crate::core::error::{CryptoError, CryptoResult};

/// Generates `len` bytes of fresh random key material.
///
/// Use this for keys that are not derived from a shared secret, e.g. a
/// standalone encryption key for a single application.
///
/// # Errors
///
/// Returns [`CryptoError::CryptoFailure`] if the operating system's
/// randomness source fails.
pub fn generate_random_key(len: usize) -> CryptoResult<Vec<u8>> {
    let mut key = vec![0u8; len];
    OsRng
        .try_fill_bytes(&mut key)
        .map_err(|_| CryptoError::CryptoFailure)?;
    Ok(key)
}
