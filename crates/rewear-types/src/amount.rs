//! Integer money and identifier newtypes.
//!
//! Amounts are wei or token base units held as `u128`, comfortably past
//! 2^64, and only ever combined with saturating arithmetic so derived
//! totals cannot panic. No floating point anywhere.

use crate::codec;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// A monetary amount in base units (wei for the native asset, smallest
/// denomination for the platform token).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(self, other: Amount) -> Amount {
        Amount(self.0.saturating_add(other.0))
    }

    /// Line subtotal: unit price times quantity.
    pub fn saturating_mul(self, quantity: u32) -> Amount {
        Amount(self.0.saturating_mul(u128::from(quantity)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Amount(value)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&codec::encode_u128(self.0))
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        codec::deserialize_u128(deserializer).map(Amount)
    }
}

/// Opaque large-integer product identifier, unique per marketplace listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(pub u128);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for ProductId {
    fn from(value: u128) -> Self {
        ProductId(value)
    }
}

impl Serialize for ProductId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&codec::encode_u128(self.0))
    }
}

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        codec::deserialize_u128(deserializer).map(ProductId)
    }
}
