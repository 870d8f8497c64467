//! Derived key material from a single master secret.
//!
//! Applications keep one secure secret and derive per-purpose keys from
//! it with PBKDF2, so the master secret is never reused across
//! incompatible contexts. The hash (SHA-1) and default iteration count
//! (1000) are fixed interoperability constants; both sides of a shared
//! token must use the same values to derive the same keys.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

use crate::core::secret::SecretBytes;

/// Iteration count matching the external producer's default.
pub const DEFAULT_ITERATIONS: u32 = 1000;

/// Derives fixed-length keys from a master secret and a context salt.
///
/// Derivation is deterministic; `cache_generate` memoizes results per
/// `(salt, key_size)` so repeated lookups share one allocation. The
/// cache is lock-guarded and lives as long as the generator.
///
/// # Example
///
/// ```rust
/// use activecrypt::KeyGenerator;
///
/// let generator = KeyGenerator::new(b"application master secret".to_vec());
/// let secret = generator.cache_generate(b"encrypted cookie", 32);
/// let sign_secret = generator.cache_generate(b"signed encrypted cookie", 64);
/// assert_eq!(secret.len(), 32);
/// assert_eq!(sign_secret.len(), 64);
/// ```
#[derive(Debug)]
pub struct KeyGenerator {
    secret: SecretBytes,
    iterations: u32,
    cache: Mutex<HashMap<(Vec<u8>, usize), Arc<[u8]>>>,
}

impl KeyGenerator {
    /// Creates a generator with the default iteration count.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self::with_iterations(secret, DEFAULT_ITERATIONS)
    }

    /// Creates a generator with an explicit iteration count.
    ///
    /// Only use a non-default count when no cross-system compatibility
    /// is required.
    pub fn with_iterations(secret: impl Into<Vec<u8>>, iterations: u32) -> Self {
        Self {
            secret: SecretBytes::new(secret.into()),
            iterations,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Derives a `key_size`-byte key for the given salt.
    #[must_use]
    pub fn generate(&self, salt: &[u8], key_size: usize) -> Vec<u8> {
        let mut key = vec![0u8; key_size];
        pbkdf2_hmac::<Sha1>(self.secret.as_bytes(), salt, self.iterations, &mut key);
        key
    }

    /// Derives a key, memoizing the result by `(salt, key_size)`.
    ///
    /// Repeated calls with the same pair return the same shared
    /// allocation. The returned buffer is immutable; do not copy it into
    /// mutable storage expecting the cache to follow.
    #[must_use]
    pub fn cache_generate(&self, salt: &[u8], key_size: usize) -> Arc<[u8]> {
        let mut cache = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let key = cache
            .entry((salt.to_vec(), key_size))
            .or_insert_with(|| Arc::from(self.generate(salt, key_size)));
        Arc::clone(key)
    }
}
