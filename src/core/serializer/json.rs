//! JSON payload serialization.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::error::{CryptoError, CryptoResult};
use crate::core::serializer::Serializer;

/// Serializes payloads as JSON.
///
/// This is the variant to use for cross-language token exchange.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> CryptoResult<String> {
        serde_json::to_string(value).map_err(|e| CryptoError::Serialize(e.to_string()))
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> CryptoResult<T> {
        serde_json::from_str(data).map_err(|e| CryptoError::Deserialize(e.to_string()))
    }

    fn strips_trailing_padding(&self) -> bool {
        // 0x10 is not a valid JSON character, trailing runs are padding.
        true
    }
}
