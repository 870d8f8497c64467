//! Error types for token operations.
//!
//! This module provides a unified error type for signing, verification,
//! encryption and key derivation. Error messages for authentication
//! failures are intentionally vague to avoid leaking which half of a
//! composite check rejected the token.

use thiserror::Error;

/// Errors that can occur when generating or consuming message tokens.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// No secret was configured for signing or verification.
    #[error("Secret not set")]
    SecretNotSet,

    /// No HMAC hash function was configured.
    #[error("Hasher not set")]
    HasherNotSet,

    /// No payload serializer was configured.
    #[error("Serializer not set")]
    SerializerNotSet,

    /// No encryption key was configured.
    #[error("Key not set")]
    KeyNotSet,

    /// Block-cipher mode requires a verifier or a signing key.
    #[error("Verifier and/or signature key not set")]
    VerifierNotSet,

    /// The message to verify is empty.
    #[error("Invalid signature - empty message")]
    EmptyMessage,

    /// Signature verification failed.
    /// Intentionally vague: a malformed token and a digest mismatch
    /// report the same error.
    #[error("Invalid signature - bad data")]
    InvalidSignature,

    /// The authentication tag did not validate.
    /// Intentionally vague: a wrong key and tampered data report the
    /// same error.
    #[error("Authentication failed - bad data")]
    AuthenticationFailed,

    /// The token does not have the expected number of segments.
    #[error("bad data: expected {want} segments, got {got}")]
    InvalidSegmentCount {
        /// Segments required by the wire format.
        want: usize,
        /// Segments found in the token.
        got: usize,
    },

    /// The ciphertext is empty or not a whole number of cipher blocks.
    #[error("bad data: ciphertext is not a multiple of the block size")]
    InvalidCiphertext,

    /// The IV or nonce length does not match the cipher's requirement.
    #[error("bad data: invalid IV or nonce length")]
    InvalidNonce,

    /// The key length is not supported by the selected cipher.
    #[error("invalid key length for cipher")]
    InvalidKeyLength,

    /// The cipher name is not one of the supported ciphers.
    #[error("cipher not set or not supported: {0}")]
    UnsupportedCipher(String),

    /// Base64 decoding error.
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),

    /// Payload serialization failed.
    #[error("serialization failed: {0}")]
    Serialize(String),

    /// Payload deserialization failed.
    #[error("deserialization failed: {0}")]
    Deserialize(String),

    /// Randomness source failure or other unrecoverable primitive error.
    #[error("Cryptographic operation failed")]
    CryptoFailure,
}

/// Result type alias for token operations.
pub type CryptoResult<T> = Result<T, CryptoError>;
