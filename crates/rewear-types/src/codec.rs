//! Marked-decimal codec for integers persisted through text-only storage.
//!
//! Cart documents store every monetary, quantity, and id field as a decimal
//! string with a trailing `n` marker (`"1000n"`) so values past 2^53 survive
//! a JSON storage medium without precision loss. Decoding also accepts
//! unmarked strings and native numbers written by older clients.
//!
//! Persisted state is user-editable; negative values clamp to zero instead
//! of propagating.

use crate::error::CodecError;
use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Trailing character marking a big-integer string.
pub const BIGINT_MARKER: char = 'n';

/// Encode an integer as its marked decimal string, e.g. `1000` → `"1000n"`.
pub fn encode_u128(value: u128) -> String {
    format!("{value}{BIGINT_MARKER}")
}

/// Decode a marked or unmarked decimal string.
///
/// The marker, if present, is stripped before parsing. Negative inputs clamp
/// to zero. Anything non-numeric is a [`CodecError`].
pub fn decode_u128(raw: &str) -> Result<u128, CodecError> {
    let digits = raw.strip_suffix(BIGINT_MARKER).unwrap_or(raw);
    if let Some(rest) = digits.strip_prefix('-') {
        return if !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()) {
            Ok(0)
        } else {
            Err(CodecError::Malformed(raw.to_string()))
        };
    }
    digits
        .parse::<u128>()
        .map_err(|_| CodecError::Malformed(raw.to_string()))
}

pub(crate) struct MarkedU128Visitor;

impl<'de> Visitor<'de> for MarkedU128Visitor {
    type Value = u128;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a marked decimal string or a non-negative integer")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<u128, E> {
        decode_u128(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<u128, E> {
        Ok(u128::from(v))
    }

    fn visit_u128<E: de::Error>(self, v: u128) -> Result<u128, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<u128, E> {
        // Negative persisted values clamp rather than error.
        Ok(u128::try_from(v).unwrap_or(0))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<u128, E> {
        if v.fract() != 0.0 {
            return Err(E::custom("fractional value where an integer was expected"));
        }
        if v < 0.0 {
            return Ok(0);
        }
        Ok(v as u128)
    }
}

pub(crate) fn deserialize_u128<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
    deserializer.deserialize_any(MarkedU128Visitor)
}

/// Serde adapter for `u32` quantity fields, sharing the marked codec.
pub mod quantity {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(quantity: &u32, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::encode_u128(u128::from(*quantity)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
        let value = super::deserialize_u128(deserializer)?;
        Ok(u32::try_from(value).unwrap_or(u32::MAX))
    }
}
