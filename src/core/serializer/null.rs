//! Pass-through payload serialization.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::error::{CryptoError, CryptoResult};
use crate::core::serializer::Serializer;

/// Passes string payloads through untouched.
///
/// `serialize` returns string values verbatim; any other value is
/// rendered as its JSON text, which is not guaranteed to round-trip.
/// `deserialize` can only populate a string-typed target and hands the
/// input back unchanged.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullSerializer;

impl Serializer for NullSerializer {
    fn serialize<T: Serialize>(&self, value: &T) -> CryptoResult<String> {
        match serde_json::to_value(value).map_err(|e| CryptoError::Serialize(e.to_string()))? {
            serde_json::Value::String(text) => Ok(text),
            other => Ok(other.to_string()),
        }
    }

    fn deserialize<T: DeserializeOwned>(&self, data: &str) -> CryptoResult<T> {
        serde_json::from_value(serde_json::Value::String(data.to_owned()))
            .map_err(|e| CryptoError::Deserialize(e.to_string()))
    }
}
