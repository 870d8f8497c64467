//! Encrypted (and signed or authenticated) message tokens.
//!
//! Two cipher modes are supported:
//!
//! - `aes-cbc` - the historical default. CBC carries no authentication of
//!   its own and is subject to padding-oracle attacks, so every CBC token
//!   is wrapped by a [`MessageVerifier`]; the mode cannot be built
//!   without one.
//! - `aes-256-gcm` - authenticated encryption. The tag authenticates the
//!   ciphertext, so GCM tokens are never wrapped by a verifier.

mod cbc_impl;
mod gcm_impl;

use core::fmt::{self, Display};
use core::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::error::{CryptoError, CryptoResult};
use crate::core::hasher::Hasher;
use crate::core::secret::SecretBytes;
use crate::core::serializer::{NullSerializer, Serializer};
use crate::core::verifier::MessageVerifier;

/// Longest accepted key in bytes. Longer keys are truncated rather than
/// rejected, matching the external producer's OpenSSL behavior.
pub(crate) const MAX_KEY_SIZE: usize = 32;

/// Truncates an over-long key to [`MAX_KEY_SIZE`] bytes.
pub(crate) fn truncate_key(key: &[u8]) -> &[u8] {
    if key.len() > MAX_KEY_SIZE {
        &key[..MAX_KEY_SIZE]
    } else {
        key
    }
}

/// Supported cipher modes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Cipher {
    /// AES in CBC mode, wrapped by an HMAC verifier.
    #[default]
    AesCbc,
    /// AES-256-GCM authenticated encryption.
    Aes256Gcm,
}

impl Cipher {
    /// The cipher's wire-configuration name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Cipher::AesCbc => "aes-cbc",
            Cipher::Aes256Gcm => "aes-256-gcm",
        }
    }
}

impl Display for Cipher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Cipher {
    type Err = CryptoError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "aes-cbc" => Ok(Cipher::AesCbc),
            "aes-256-gcm" => Ok(Cipher::Aes256Gcm),
            other => Err(CryptoError::UnsupportedCipher(other.to_string())),
        }
    }
}

/// Cipher mode with its composition requirement carried by the type:
/// the CBC variant owns the wrapping verifier, the GCM variant is
/// self-authenticating and has none.
enum Mode {
    Cbc {
        verifier: MessageVerifier<NullSerializer>,
    },
    Gcm,
}

/// Encrypts values into opaque tokens that untrusted storage cannot
/// read or forge.
///
/// # Example
///
/// ```rust
/// use activecrypt::{generate_random_key, JsonSerializer, MessageEncryptor};
///
/// let key = generate_random_key(32).expect("randomness available");
/// let encryptor = MessageEncryptor::builder()
///     .key(key)
///     .sign_key(b"signature secret!".to_vec())
///     .serializer(JsonSerializer)
///     .build()
///     .expect("valid configuration");
///
/// let token = encryptor.encrypt_and_sign(&"my secret data").expect("encrypt");
/// let value: String = encryptor.decrypt_and_verify(&token).expect("decrypt");
/// assert_eq!(value, "my secret data");
/// ```
pub struct MessageEncryptor<S> {
    key: SecretBytes,
    mode: Mode,
    serializer: S,
}

impl<S: Serializer> MessageEncryptor<S> {
    /// Returns a builder that validates the full configuration at
    /// `build()` time.
    #[must_use]
    pub fn builder() -> MessageEncryptorBuilder<S> {
        MessageEncryptorBuilder::new()
    }

    /// Encrypts `value` and makes the token tamper-evident.
    ///
    /// In CBC mode the encrypted token is wrapped with an outer HMAC
    /// signature; in GCM mode the authentication tag already covers the
    /// ciphertext and the token is returned as-is. Prefer this over
    /// [`encrypt`](Self::encrypt), which alone is unauthenticated in
    /// CBC mode.
    pub fn encrypt_and_sign<T: Serialize>(&self, value: &T) -> CryptoResult<String> {
        match &self.mode {
            Mode::Gcm => self.encrypt(value),
            Mode::Cbc { verifier } => {
                let inner = self.encrypt(value)?;
                verifier.generate(&inner)
            }
        }
    }

    /// Reverses [`encrypt_and_sign`](Self::encrypt_and_sign), validating
    /// the signature or authentication tag before decrypting.
    pub fn decrypt_and_verify<T: DeserializeOwned>(&self, message: &str) -> CryptoResult<T> {
        match &self.mode {
            Mode::Gcm => self.decrypt(message),
            Mode::Cbc { verifier } => {
                let inner: String = verifier.verify(message)?;
                self.decrypt(&inner)
            }
        }
    }

    /// Encrypts `value` without the outer signature layer.
    ///
    /// A CBC token produced this way is not tamper-evident; use
    /// [`encrypt_and_sign`](Self::encrypt_and_sign) unless an outer
    /// layer signs the token elsewhere.
    pub fn encrypt<T: Serialize>(&self, value: &T) -> CryptoResult<String> {
        let plaintext = self.serializer.serialize(value)?;
        match &self.mode {
            Mode::Cbc { .. } => cbc_impl::encrypt(self.key.as_bytes(), plaintext.as_bytes()),
            Mode::Gcm => gcm_impl::encrypt(self.key.as_bytes(), plaintext.as_bytes()),
        }
    }

    /// Decrypts a token produced by [`encrypt`](Self::encrypt).
    pub fn decrypt<T: DeserializeOwned>(&self, message: &str) -> CryptoResult<T> {
        let text = match &self.mode {
            Mode::Cbc { .. } => cbc_impl::decrypt(
                self.key.as_bytes(),
                message,
                self.serializer.strips_trailing_padding(),
            )?,
            Mode::Gcm => gcm_impl::decrypt(self.key.as_bytes(), message)?,
        };
        self.serializer.deserialize(&text)
    }
}

/// Builder for [`MessageEncryptor`].
///
/// The encryption key and serializer are always required. CBC mode (the
/// default) additionally needs either an explicit verifier or a signing
/// key from which the default SHA-1 verifier is built. GCM mode is
/// self-authenticating and ignores the signing configuration.
pub struct MessageEncryptorBuilder<S> {
    key: Option<Vec<u8>>,
    sign_key: Option<Vec<u8>>,
    cipher: Option<Cipher>,
    verifier: Option<MessageVerifier<NullSerializer>>,
    serializer: Option<S>,
}

impl<S: Serializer> MessageEncryptorBuilder<S> {
    fn new() -> Self {
        Self {
            key: None,
            sign_key: None,
            cipher: None,
            verifier: None,
            serializer: None,
        }
    }

    /// Sets the encryption key.
    #[must_use]
    pub fn key(mut self, key: impl Into<Vec<u8>>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Sets the signing key used to build the default CBC verifier.
    #[must_use]
    pub fn sign_key(mut self, sign_key: impl Into<Vec<u8>>) -> Self {
        self.sign_key = Some(sign_key.into());
        self
    }

    /// Selects the cipher mode. Defaults to [`Cipher::AesCbc`].
    #[must_use]
    pub fn cipher(mut self, cipher: Cipher) -> Self {
        self.cipher = Some(cipher);
        self
    }

    /// Sets an explicit verifier for CBC mode, replacing the default
    /// built from the signing key.
    #[must_use]
    pub fn verifier(mut self, verifier: MessageVerifier<NullSerializer>) -> Self {
        self.verifier = Some(verifier);
        self
    }

    /// Sets the payload serializer.
    #[must_use]
    pub fn serializer(mut self, serializer: S) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Validates the configuration and builds the encryptor.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::KeyNotSet`],
    /// [`CryptoError::SerializerNotSet`], or - in CBC mode with neither
    /// verifier nor signing key - [`CryptoError::VerifierNotSet`].
    pub fn build(self) -> CryptoResult<MessageEncryptor<S>> {
        let key = self
            .key
            .filter(|k| !k.is_empty())
            .ok_or(CryptoError::KeyNotSet)?;
        let serializer = self.serializer.ok_or(CryptoError::SerializerNotSet)?;
        let mode = match self.cipher.unwrap_or_default() {
            Cipher::AesCbc => {
                let verifier = match self.verifier {
                    Some(verifier) => verifier,
                    None => {
                        let sign_key = self.sign_key.ok_or(CryptoError::VerifierNotSet)?;
                        MessageVerifier::new(sign_key, Hasher::Sha1, NullSerializer)?
                    }
                };
                Mode::Cbc { verifier }
            }
            Cipher::Aes256Gcm => Mode::Gcm,
        };
        Ok(MessageEncryptor {
            key: SecretBytes::new(key),
            mode,
            serializer,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::random::generate_random_key;
    use crate::core::serializer::JsonSerializer;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Person {
        id: u32,
        first_name: String,
        last_name: String,
        age: u32,
    }

    fn john() -> Person {
        Person {
            id: 12,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            age: 42,
        }
    }

    fn cbc_encryptor() -> MessageEncryptor<JsonSerializer> {
        MessageEncryptor::builder()
            .key(generate_random_key(32).expect("rng"))
            .sign_key(b"signature secret!".to_vec())
            .serializer(JsonSerializer)
            .build()
            .expect("valid configuration")
    }

    fn gcm_encryptor() -> MessageEncryptor<JsonSerializer> {
        MessageEncryptor::builder()
            .key(generate_random_key(32).expect("rng"))
            .cipher(Cipher::Aes256Gcm)
            .serializer(JsonSerializer)
            .build()
            .expect("valid configuration")
    }

    #[test]
    fn test_cipher_names_round_trip() -> CryptoResult<()> {
        assert_eq!("aes-cbc".parse::<Cipher>()?, Cipher::AesCbc);
        assert_eq!("aes-256-gcm".parse::<Cipher>()?, Cipher::Aes256Gcm);
        assert_eq!(Cipher::AesCbc.to_string(), "aes-cbc");
        assert_eq!(Cipher::Aes256Gcm.to_string(), "aes-256-gcm");
        Ok(())
    }

    #[test]
    fn test_unknown_cipher_name_is_rejected() {
        let result = "aes-999".parse::<Cipher>();
        assert!(matches!(result, Err(CryptoError::UnsupportedCipher(_))));
    }

    #[test]
    fn test_cbc_unsigned_round_trip() -> CryptoResult<()> {
        let encryptor = cbc_encryptor();
        let token = encryptor.encrypt(&"my secret data")?;
        assert_eq!(token.split("--").count(), 2);
        let value: String = encryptor.decrypt(&token)?;
        assert_eq!(value, "my secret data");
        Ok(())
    }

    #[test]
    fn test_cbc_signed_round_trip() -> CryptoResult<()> {
        let encryptor = cbc_encryptor();
        let token = encryptor.encrypt_and_sign(&"my secret data")?;
        assert_eq!(token.split("--").count(), 2);
        let value: String = encryptor.decrypt_and_verify(&token)?;
        assert_eq!(value, "my secret data");
        Ok(())
    }

    #[test]
    fn test_cbc_signed_struct_round_trip() -> CryptoResult<()> {
        let encryptor = cbc_encryptor();
        let token = encryptor.encrypt_and_sign(&john())?;
        let value: Person = encryptor.decrypt_and_verify(&token)?;
        assert_eq!(value, john());
        Ok(())
    }

    #[test]
    fn test_cbc_repeated_round_trips() -> CryptoResult<()> {
        let encryptor = cbc_encryptor();
        for _ in 0..100 {
            let token = encryptor.encrypt_and_sign(&"this is a test")?;
            let value: String = encryptor.decrypt_and_verify(&token)?;
            assert_eq!(value, "this is a test");
        }
        Ok(())
    }

    #[test]
    fn test_gcm_unsigned_round_trip() -> CryptoResult<()> {
        let encryptor = gcm_encryptor();
        let token = encryptor.encrypt(&"my secret data")?;
        assert_eq!(token.split("--").count(), 3);
        let value: String = encryptor.decrypt(&token)?;
        assert_eq!(value, "my secret data");
        Ok(())
    }

    #[test]
    fn test_gcm_struct_round_trip() -> CryptoResult<()> {
        let encryptor = gcm_encryptor();
        let token = encryptor.encrypt_and_sign(&john())?;
        assert_eq!(token.split("--").count(), 3);
        let value: Person = encryptor.decrypt_and_verify(&token)?;
        assert_eq!(value, john());
        Ok(())
    }

    #[test]
    fn test_gcm_repeated_round_trips() -> CryptoResult<()> {
        let encryptor = gcm_encryptor();
        for _ in 0..100 {
            let token = encryptor.encrypt_and_sign(&"this is a test")?;
            let value: String = encryptor.decrypt_and_verify(&token)?;
            assert_eq!(value, "this is a test");
        }
        Ok(())
    }

    #[test]
    fn test_fresh_iv_per_encryption() -> CryptoResult<()> {
        let encryptor = cbc_encryptor();
        let a = encryptor.encrypt(&"same payload")?;
        let b = encryptor.encrypt(&"same payload")?;
        assert_ne!(a, b);

        let encryptor = gcm_encryptor();
        let a = encryptor.encrypt(&"same payload")?;
        let b = encryptor.encrypt(&"same payload")?;
        assert_ne!(a, b);
        Ok(())
    }

    #[test]
    fn test_cbc_tampered_token_is_rejected() -> CryptoResult<()> {
        let encryptor = cbc_encryptor();
        let token = encryptor.encrypt_and_sign(&john())?;
        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] ^= 0x01;
            let Ok(tampered) = String::from_utf8(bytes) else {
                continue;
            };
            let result: CryptoResult<Person> = encryptor.decrypt_and_verify(&tampered);
            assert!(result.is_err(), "tampered byte {i} must be rejected");
        }
        Ok(())
    }

    #[test]
    fn test_gcm_tampered_token_is_rejected() -> CryptoResult<()> {
        let encryptor = gcm_encryptor();
        let token = encryptor.encrypt_and_sign(&john())?;
        let segments: Vec<&str> = token.split("--").collect();

        // Tamper each of ciphertext, nonce and tag in turn.
        for i in 0..3 {
            let mut parts = segments.clone();
            let flipped = if parts[i].starts_with('A') { "B" } else { "A" };
            let mut segment = parts[i].to_string();
            segment.replace_range(0..1, flipped);
            parts[i] = &segment;
            let tampered = parts.join("--");
            let result: CryptoResult<Person> = encryptor.decrypt_and_verify(&tampered);
            assert!(result.is_err(), "tampered segment {i} must be rejected");
        }
        Ok(())
    }

    #[test]
    fn test_long_key_equivalent_to_truncated_prefix() -> CryptoResult<()> {
        let long_key = generate_random_key(64)?;
        let short_key = long_key[..32].to_vec();

        let long = MessageEncryptor::builder()
            .key(long_key.clone())
            .sign_key(b"signature secret!".to_vec())
            .serializer(JsonSerializer)
            .build()?;
        let short = MessageEncryptor::builder()
            .key(short_key.clone())
            .sign_key(b"signature secret!".to_vec())
            .serializer(JsonSerializer)
            .build()?;
        let token = long.encrypt_and_sign(&john())?;
        let value: Person = short.decrypt_and_verify(&token)?;
        assert_eq!(value, john());

        let long = MessageEncryptor::builder()
            .key(long_key)
            .cipher(Cipher::Aes256Gcm)
            .serializer(JsonSerializer)
            .build()?;
        let short = MessageEncryptor::builder()
            .key(short_key)
            .cipher(Cipher::Aes256Gcm)
            .serializer(JsonSerializer)
            .build()?;
        let token = long.encrypt_and_sign(&john())?;
        let value: Person = short.decrypt_and_verify(&token)?;
        assert_eq!(value, john());
        Ok(())
    }

    #[test]
    fn test_missing_configuration_is_rejected() {
        let result = MessageEncryptor::<JsonSerializer>::builder()
            .sign_key(b"signature secret!".to_vec())
            .serializer(JsonSerializer)
            .build();
        assert!(matches!(result, Err(CryptoError::KeyNotSet)));

        let result = MessageEncryptor::<JsonSerializer>::builder()
            .key(vec![0u8; 32])
            .sign_key(b"signature secret!".to_vec())
            .build();
        assert!(matches!(result, Err(CryptoError::SerializerNotSet)));

        let result = MessageEncryptor::<JsonSerializer>::builder()
            .key(vec![0u8; 32])
            .serializer(JsonSerializer)
            .build();
        assert!(matches!(result, Err(CryptoError::VerifierNotSet)));
    }

    #[test]
    fn test_explicit_verifier_is_used() -> CryptoResult<()> {
        let verifier = MessageVerifier::new(
            b"explicit verifier secret".to_vec(),
            Hasher::Sha256,
            NullSerializer,
        )?;
        let encryptor = MessageEncryptor::builder()
            .key(generate_random_key(32)?)
            .verifier(verifier)
            .serializer(JsonSerializer)
            .build()?;
        let token = encryptor.encrypt_and_sign(&"payload")?;
        let value: String = encryptor.decrypt_and_verify(&token)?;
        assert_eq!(value, "payload");
        Ok(())
    }

    #[test]
    fn test_wrong_segment_counts_are_rejected() {
        let encryptor = cbc_encryptor();
        let result: CryptoResult<String> = encryptor.decrypt("Zm9v--YmFy--YmF6");
        assert!(matches!(
            result,
            Err(CryptoError::InvalidSegmentCount { want: 2, got: 3 })
        ));

        let encryptor = gcm_encryptor();
        let result: CryptoResult<String> = encryptor.decrypt("Zm9v--YmFy");
        assert!(matches!(
            result,
            Err(CryptoError::InvalidSegmentCount { want: 3, got: 2 })
        ));
    }
}
