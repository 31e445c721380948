//! Payload types decoded from the `data` field of gateway envelopes.
//!
//! The gateway omits fields freely, so every struct defaults missing fields.
//! A field present with the wrong JSON type is still a decode error.

pub mod order;
pub mod settlement;

pub use order::*;
pub use settlement::*;

use serde::{Deserialize, Deserializer};

/// Deserialize `null` as `T::default()`.
///
/// The gateway sends `null` instead of `[]` for empty lists.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
