//! Tamper-evident signed message tokens.
//!
//! A verifier turns a value into `base64(payload)--hexdigest` and back,
//! rejecting any token whose HMAC digest does not match. Signed tokens
//! are readable by anyone; use the encryptor when the payload must also
//! stay confidential.

use base64::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use subtle::ConstantTimeEq;

use crate::core::error::{CryptoError, CryptoResult};
use crate::core::hasher::Hasher;
use crate::core::secret::SecretBytes;
use crate::core::serializer::Serializer;
use crate::core::token::DELIMITER;

/// Generates and verifies HMAC-signed message tokens.
///
/// Useful for payloads like remember-me tokens and unsubscribe links
/// that travel through untrusted storage.
///
/// # Example
///
/// ```rust
/// use activecrypt::{Hasher, JsonSerializer, MessageVerifier};
///
/// let verifier = MessageVerifier::new(b"Hey, I'm a secret!".to_vec(), Hasher::Sha1, JsonSerializer)
///     .expect("non-empty secret");
/// let token = verifier.generate(&"hello").expect("serializable");
/// let value: String = verifier.verify(&token).expect("untampered");
/// assert_eq!(value, "hello");
/// ```
#[derive(Debug)]
pub struct MessageVerifier<S> {
    secret: SecretBytes,
    hasher: Hasher,
    serializer: S,
}

impl<S: Serializer> MessageVerifier<S> {
    /// Creates a verifier from a secret, hash selector and serializer.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::SecretNotSet`] when the secret is empty.
    pub fn new(secret: impl Into<Vec<u8>>, hasher: Hasher, serializer: S) -> CryptoResult<Self> {
        let secret = SecretBytes::new(secret.into());
        if secret.is_empty() {
            return Err(CryptoError::SecretNotSet);
        }
        Ok(Self {
            secret,
            hasher,
            serializer,
        })
    }

    /// Returns a builder that validates the full configuration at
    /// `build()` time.
    #[must_use]
    pub fn builder() -> MessageVerifierBuilder<S> {
        MessageVerifierBuilder::new()
    }

    /// Signs `value`, returning the serialized data and its digest as a
    /// single tamper-evident token.
    pub fn generate<T: Serialize>(&self, value: &T) -> CryptoResult<String> {
        let data = self.serializer.serialize(value)?;
        let encoded = BASE64_STANDARD.encode(data.as_bytes());
        let digest = self.digest_for(&encoded);
        Ok(format!("{encoded}{DELIMITER}{digest}"))
    }

    /// Checks the digest of a token produced by
    /// [`generate`](Self::generate) and rebuilds the signed value.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::EmptyMessage`] for an empty token and
    /// [`CryptoError::InvalidSignature`] for any malformed or tampered
    /// token, without distinguishing the cause.
    pub fn verify<T: DeserializeOwned>(&self, message: &str) -> CryptoResult<T> {
        if message.is_empty() {
            return Err(CryptoError::EmptyMessage);
        }
        let segments: Vec<&str> = message.split(DELIMITER).collect();
        let [data, digest] = segments.as_slice() else {
            return Err(CryptoError::InvalidSignature);
        };
        if !secure_compare(digest, &self.digest_for(data)) {
            return Err(CryptoError::InvalidSignature);
        }
        let decoded = BASE64_STANDARD.decode(data)?;
        let text =
            String::from_utf8(decoded).map_err(|e| CryptoError::Deserialize(e.to_string()))?;
        self.serializer.deserialize(&text)
    }

    /// Computes the lower-case hex digest of `data` under the configured
    /// secret and hash function.
    #[must_use]
    pub fn digest_for(&self, data: &str) -> String {
        self.hasher.hmac_hex(self.secret.as_bytes(), data.as_bytes())
    }
}

/// Constant-time string equality.
///
/// Digest lengths are public, so the early return on a length mismatch
/// leaks nothing secret.
fn secure_compare(a: &str, b: &str) -> bool {
    a.len() == b.len() && bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}

/// Builder for [`MessageVerifier`].
///
/// Every required piece is checked eagerly in [`build`](Self::build),
/// before any cryptographic work can happen.
#[derive(Debug)]
pub struct MessageVerifierBuilder<S> {
    secret: Option<Vec<u8>>,
    hasher: Option<Hasher>,
    serializer: Option<S>,
}

impl<S: Serializer> MessageVerifierBuilder<S> {
    fn new() -> Self {
        Self {
            secret: None,
            hasher: None,
            serializer: None,
        }
    }

    /// Sets the signing secret.
    #[must_use]
    pub fn secret(mut self, secret: impl Into<Vec<u8>>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Sets the HMAC hash function.
    #[must_use]
    pub fn hasher(mut self, hasher: Hasher) -> Self {
        self.hasher = Some(hasher);
        self
    }

    /// Sets the payload serializer.
    #[must_use]
    pub fn serializer(mut self, serializer: S) -> Self {
        self.serializer = Some(serializer);
        self
    }

    /// Validates the configuration and builds the verifier.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::SecretNotSet`],
    /// [`CryptoError::HasherNotSet`] or
    /// [`CryptoError::SerializerNotSet`] for the first missing piece.
    pub fn build(self) -> CryptoResult<MessageVerifier<S>> {
        let secret = self
            .secret
            .filter(|s| !s.is_empty())
            .ok_or(CryptoError::SecretNotSet)?;
        let hasher = self.hasher.ok_or(CryptoError::HasherNotSet)?;
        let serializer = self.serializer.ok_or(CryptoError::SerializerNotSet)?;
        MessageVerifier::new(secret, hasher, serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::serializer::{JsonSerializer, NullSerializer, XmlSerializer};
    use serde::Deserialize;

    const SECRET: &[u8] = b"Hey, I'm a secret!";

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "PascalCase")]
    struct TestMessage {
        foo: String,
        bar: u32,
    }

    fn test_message() -> TestMessage {
        TestMessage {
            foo: "foo".to_string(),
            bar: 42,
        }
    }

    fn reverse(s: &str) -> String {
        s.chars().rev().collect()
    }

    fn sha1_verifier() -> MessageVerifier<JsonSerializer> {
        MessageVerifier::new(SECRET.to_vec(), Hasher::Sha1, JsonSerializer)
            .expect("valid configuration")
    }

    #[test]
    fn test_digest_for_known_vector() {
        let verifier = sha1_verifier();
        assert_eq!(
            verifier.digest_for("eyJGb28iOiJmb28iLCJCYXIiOjQyfQ=="),
            "b1bdb9d2b372f19dcca800e5989ee7502f1b72a5"
        );
    }

    #[test]
    fn test_generate_known_token() -> CryptoResult<()> {
        let verifier = sha1_verifier();
        let token = verifier.generate(&test_message())?;
        assert_eq!(
            token,
            "eyJGb28iOiJmb28iLCJCYXIiOjQyfQ==--b1bdb9d2b372f19dcca800e5989ee7502f1b72a5"
        );
        Ok(())
    }

    #[test]
    fn test_round_trip_all_hashers() -> CryptoResult<()> {
        for hasher in [Hasher::Md5, Hasher::Sha1, Hasher::Sha256, Hasher::Sha512] {
            let verifier = MessageVerifier::new(SECRET.to_vec(), hasher, JsonSerializer)?;
            let token = verifier.generate(&test_message())?;
            let verified: TestMessage = verifier.verify(&token)?;
            assert_eq!(verified, test_message());
        }
        Ok(())
    }

    #[test]
    fn test_round_trip_xml_serializer() -> CryptoResult<()> {
        let verifier =
            MessageVerifier::new(b"Hey, I'm another secret!".to_vec(), Hasher::Sha1, XmlSerializer)?;
        let token = verifier.generate(&test_message())?;
        let verified: TestMessage = verifier.verify(&token)?;
        assert_eq!(verified, test_message());
        Ok(())
    }

    #[test]
    fn test_round_trip_null_serializer() -> CryptoResult<()> {
        let verifier = MessageVerifier::new(SECRET.to_vec(), Hasher::Sha1, NullSerializer)?;
        let token = verifier.generate(&"opaque inner token")?;
        let verified: String = verifier.verify(&token)?;
        assert_eq!(verified, "opaque inner token");
        Ok(())
    }

    #[test]
    fn test_tampered_data_is_rejected() -> CryptoResult<()> {
        let verifier = sha1_verifier();
        let token = verifier.generate(&test_message())?;
        let (data, digest) = token.split_once("--").expect("two segments");

        let reversed_data = format!("{}--{digest}", reverse(data));
        let result: CryptoResult<TestMessage> = verifier.verify(&reversed_data);
        assert_eq!(
            result.expect_err("must reject").to_string(),
            "Invalid signature - bad data"
        );

        let reversed_digest = format!("{data}--{}", reverse(digest));
        let result: CryptoResult<TestMessage> = verifier.verify(&reversed_digest);
        assert_eq!(
            result.expect_err("must reject").to_string(),
            "Invalid signature - bad data"
        );
        Ok(())
    }

    #[test]
    fn test_garbage_input_is_rejected() {
        let verifier = sha1_verifier();
        let result: CryptoResult<TestMessage> = verifier.verify("garbage data");
        assert_eq!(
            result.expect_err("must reject").to_string(),
            "Invalid signature - bad data"
        );
    }

    #[test]
    fn test_flipped_bytes_are_rejected() -> CryptoResult<()> {
        let verifier = sha1_verifier();
        let token = verifier.generate(&test_message())?;
        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] ^= 0x01;
            let Ok(tampered) = String::from_utf8(bytes) else {
                continue;
            };
            let result: CryptoResult<TestMessage> = verifier.verify(&tampered);
            assert!(result.is_err(), "tampered byte {i} must be rejected");
        }
        Ok(())
    }

    #[test]
    fn test_empty_message_is_rejected() {
        let verifier = sha1_verifier();
        let result: CryptoResult<TestMessage> = verifier.verify("");
        assert!(matches!(result, Err(CryptoError::EmptyMessage)));
    }

    #[test]
    fn test_empty_secret_is_rejected() {
        let result = MessageVerifier::new(Vec::new(), Hasher::Sha1, JsonSerializer);
        assert!(matches!(result, Err(CryptoError::SecretNotSet)));
    }

    #[test]
    fn test_builder_reports_missing_pieces() {
        let result = MessageVerifier::<JsonSerializer>::builder()
            .hasher(Hasher::Sha1)
            .serializer(JsonSerializer)
            .build();
        assert!(matches!(result, Err(CryptoError::SecretNotSet)));

        let result = MessageVerifier::<JsonSerializer>::builder()
            .secret(SECRET.to_vec())
            .serializer(JsonSerializer)
            .build();
        assert!(matches!(result, Err(CryptoError::HasherNotSet)));

        let result = MessageVerifier::<JsonSerializer>::builder()
            .secret(SECRET.to_vec())
            .hasher(Hasher::Sha1)
            .build();
        assert!(matches!(result, Err(CryptoError::SerializerNotSet)));
    }

    #[test]
    fn test_builder_builds_working_verifier() -> CryptoResult<()> {
        let verifier = MessageVerifier::builder()
            .secret(SECRET.to_vec())
            .hasher(Hasher::Sha1)
            .serializer(JsonSerializer)
            .build()?;
        let token = verifier.generate(&test_message())?;
        let verified: TestMessage = verifier.verify(&token)?;
        assert_eq!(verified, test_message());
        Ok(())
    }
}
