//! Signed and encrypted message tokens interoperable with Rails.
//!
//! This crate reimplements the cryptographic message scheme used by
//! Rails' ActiveSupport (`MessageVerifier`, `MessageEncryptor`,
//! `KeyGenerator`) so independently-written applications can exchange
//! authenticated - and optionally confidential - payloads over an
//! untrusted channel such as a browser cookie, using only a shared
//! secret. Tokens are bit-for-bit compatible in both directions.
//!
//! # Quick Start
//!
//! Signing alone leaves the payload readable but tamper-evident:
//!
//! ```rust
//! use activecrypt::{Hasher, JsonSerializer, MessageVerifier};
//!
//! let verifier = MessageVerifier::new(b"Hey, I'm a secret!".to_vec(), Hasher::Sha1, JsonSerializer)
//!     .expect("non-empty secret");
//!
//! let token = verifier.generate(&"hello").expect("serializable value");
//! let value: String = verifier.verify(&token).expect("untampered token");
//! assert_eq!(value, "hello");
//! ```
//!
//! Encrypting keeps the payload confidential as well:
//!
//! ```rust
//! use activecrypt::{generate_random_key, JsonSerializer, MessageEncryptor};
//!
//! let key = generate_random_key(32).expect("randomness available");
//! let encryptor = MessageEncryptor::builder()
//!     .key(key)
//!     .sign_key(b"signature secret!".to_vec())
//!     .serializer(JsonSerializer)
//!     .build()
//!     .expect("valid configuration");
//!
//! let token = encryptor.encrypt_and_sign(&"my secret data").expect("encrypt");
//! let value: String = encryptor.decrypt_and_verify(&token).expect("decrypt");
//! assert_eq!(value, "my secret data");
//! ```
//!
//! # Token formats
//!
//! All segments are standard base64 with padding, digests lower-case
//! hex, joined by `--`:
//!
//! | Mode | Format |
//! |------|--------|
//! | signed | `base64(payload)--hexdigest` |
//! | `aes-cbc`, inner | `base64(ciphertext)--base64(iv)` |
//! | `aes-cbc`, signed | `base64(inner token)--hexdigest` |
//! | `aes-256-gcm` | `base64(ciphertext)--base64(nonce)--base64(tag)` |
//!
//! # Sharing a session with an external application
//!
//! Both sides derive their keys from one master secret with
//! [`KeyGenerator`]; the salts, iteration count (1000) and derivation
//! hash (SHA-1) must match on both ends:
//!
//! ```rust
//! use activecrypt::{JsonSerializer, KeyGenerator, MessageEncryptor};
//!
//! let master_secret = b"application master secret".to_vec();
//! let generator = KeyGenerator::new(master_secret);
//! let secret = generator.cache_generate(b"encrypted cookie", 32);
//! let sign_secret = generator.cache_generate(b"signed encrypted cookie", 64);
//!
//! let encryptor = MessageEncryptor::builder()
//!     .key(secret.to_vec())
//!     .sign_key(sign_secret.to_vec())
//!     .serializer(JsonSerializer)
//!     .build()
//!     .expect("valid configuration");
//! # let token = encryptor.encrypt_and_sign(&"session").expect("encrypt");
//! # let value: String = encryptor.decrypt_and_verify(&token).expect("decrypt");
//! # assert_eq!(value, "session");
//! ```
//!
//! # Security
//!
//! - CBC mode is always wrapped by a verifier; unauthenticated CBC is
//!   subject to padding-oracle attacks and cannot be configured here.
//! - GCM mode is self-authenticating and is never wrapped.
//! - Digest and tag comparisons are constant-time.
//! - Key material is zeroized on drop and redacted from `Debug` output.
//! - A fresh random IV/nonce is drawn for every encryption.

pub mod core;

// Re-export commonly used items at crate root
pub use core::error::{CryptoError, CryptoResult};

pub use core::encryptor::{Cipher, MessageEncryptor, MessageEncryptorBuilder};
pub use core::hasher::Hasher;
pub use core::keygen::{KeyGenerator, DEFAULT_ITERATIONS};
pub use core::random::generate_random_key;
pub use core::serializer::{JsonSerializer, NullSerializer, Serializer, XmlSerializer};
pub use core::verifier::{MessageVerifier, MessageVerifierBuilder};
