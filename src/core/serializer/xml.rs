//! XML payload serialization.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::error::{CryptoError, CryptoResult};
use crate::core::serializer::Serializer;

/// Root element wrapping every serialized payload.
///
/// The deserializer accepts any root name, so the fixed tag only needs
/// to be stable between producer and consumer.
const ROOT_TAG: &str = "message";

/// Serializes payloads as XML.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct XmlSerializer;

impl Serializer for XmlSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> CryptoResult<String> {
        quick_xml::se::to_string_with_root(ROOT_TAG, value)
            .map_err(|e| CryptoError::Serialize(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> CryptoResult<T> {
        quick_xml::de::from_str(data).map_err(|e| CryptoError::Deserialize(e.to_string()))
    }
}
