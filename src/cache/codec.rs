//! Codec Module
//!
//! Turns values into transport strings and back.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// Serialization boundary between the facade and the backend.
pub trait Codec: Send + Sync {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String>;

    fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T>;

    /// Payload describing an object with every field defaulted.
    fn empty_document(&self) -> &'static str;
}

// == JSON Codec ==
/// serde_json codec, the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, payload: &str) -> Result<T> {
        Ok(serde_json::from_str(payload)?)
    }

    fn empty_document(&self) -> &'static str {
        "{}"
    }
}
