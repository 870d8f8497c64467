//! Core types and operations.
//!
//! This module provides the building blocks of the token pipeline:
//!
//! - [`error`] - Unified error type for all operations
//! - [`keygen`] - Derived key material from a master secret
//! - [`serializer`] - Pluggable payload serialization
//! - [`hasher`] - HMAC hash function selection
//! - [`verifier`] - Signed message tokens
//! - [`encryptor`] - Encrypted and signed/authenticated message tokens
//! - [`padding`] - Block-padding codec
//! - [`random`] - Cryptographically secure key material

pub mod encryptor;
pub mod error;
pub mod hasher;
pub mod keygen;
pub mod padding;
pub mod random;
pub mod serializer;
pub mod verifier;

mod secret;
pub(crate) mod token;

// Re-export commonly used items
pub use error::{CryptoError, CryptoResult};
