//! Pluggable payload serialization.
//!
//! Both the verifier and the encryptor carry values through a text
//! representation chosen at construction time:
//!
//! - [`JsonSerializer`] - structured values as JSON (cross-language default)
//! - [`XmlSerializer`] - structured values as XML
//! - [`NullSerializer`] - pass-through for payloads that are already text

mod json;
mod null;
mod xml;

pub use json::JsonSerializer;
pub use null::NullSerializer;
pub use xml::XmlSerializer;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::error::CryptoResult;

/// Converts values to and from a self-delimiting text form.
///
/// A serializer is fixed per verifier/encryptor instance; both ends of a
/// shared token must agree on the variant.
pub trait Serializer {
    /// Renders `value` as text.
    fn serialize<T: Serialize>(&self, value: &T) -> CryptoResult<String>;

    /// Rebuilds a value from text produced by [`serialize`](Self::serialize).
    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> CryptoResult<T>;

    /// Whether a trailing run of 0x10 bytes can be dropped from decrypted
    /// text without corrupting valid payloads.
    ///
    /// Some producers pad block ciphertext with 0x10 bytes this crate
    /// never emits; a format in which 0x10 is never valid trailing data
    /// can opt in to stripping them on decrypt.
    fn strips_trailing_padding(&self) -> bool {
        false
    }
}
