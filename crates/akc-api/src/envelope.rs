//! The uniform response wrapper returned by every gateway call.
//!
//! ```json
//! { "code": "0", "success": true, "message": "ok", "data": { … } }
//! ```
//!
//! `code` is sometimes a string and sometimes a number; it is normalized to a
//! `String` while decoding. `data` stays an untyped JSON value until `success`
//! has been checked.

use serde::de::{self, DeserializeOwned, Unexpected};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::ApiError;

/// Decoded response envelope.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Envelope {
    #[serde(default, deserialize_with = "code_as_string")]
    pub code: String,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

/// Wire forms of `code`.
#[derive(Deserialize)]
#[serde(untagged)]
enum WireCode {
    Text(String),
    Number(serde_json::Number),
}

fn code_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Option::<WireCode>::deserialize(deserializer)? {
        Some(WireCode::Text(s)) => s,
        Some(WireCode::Number(n)) => n.to_string(),
        None => String::new(),
    })
}

impl Envelope {
    /// Parse a raw response body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ApiError> {
        serde_json::from_slice(bytes).map_err(ApiError::EnvelopeDecode)
    }

    pub fn is_successful(&self) -> bool {
        self.success
    }

    /// Unwrap `data`, or fail with [`ApiError::Rejected`].
    pub fn into_data(self) -> Result<Value, ApiError> {
        if self.success {
            Ok(self.data)
        } else {
            Err(ApiError::Rejected {
                code: self.code,
                message: self.message,
            })
        }
    }

    /// Unwrap `data` and decode it as `T`.
    ///
    /// `interface` names the operation in decode errors.
    pub fn decode<T: DeserializeOwned>(self, interface: &'static str) -> Result<T, ApiError> {
        let data = self.into_data()?;
        serde_json::from_value(data).map_err(|source| ApiError::Decode { interface, source })
    }

    /// Like [`decode`](Self::decode), but `data` must be a JSON object.
    ///
    /// Derived struct deserializers also accept arrays (fields by position),
    /// which would let a mis-shaped payload decode into defaults.
    pub fn decode_object<T: DeserializeOwned>(self, interface: &'static str) -> Result<T, ApiError> {
        let data = self.into_data()?;
        if !data.is_object() {
            let source = de::Error::invalid_type(unexpected(&data), &"a JSON object");
            return Err(ApiError::Decode { interface, source });
        }
        serde_json::from_value(data).map_err(|source| ApiError::Decode { interface, source })
    }
}

fn unexpected(value: &Value) -> Unexpected<'_> {
    match value {
        Value::Null => Unexpected::Unit,
        Value::Bool(b) => Unexpected::Bool(*b),
        Value::Number(_) => Unexpected::Other("number"),
        Value::String(s) => Unexpected::Str(s),
        Value::Array(_) => Unexpected::Seq,
        Value::Object(_) => Unexpected::Map,
    }
}
