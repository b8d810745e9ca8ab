//! Serde support for [`FlakeId`].
//!
//! Identifiers serialize as decimal strings so clients whose numeric type
//! lacks a full 64-bit mantissa (JavaScript's `Number`) keep precision.
//! Deserialization accepts both the string form and a bare integer.

use core::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::id::FlakeId;

impl Serialize for FlakeId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FlakeId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(FlakeIdVisitor)
    }
}

struct FlakeIdVisitor;

impl Visitor<'_> for FlakeIdVisitor {
    type Value = FlakeId;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a decimal string or a 64-bit integer")
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        FlakeId::parse_decimal(v).map_err(de::Error::custom)
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(FlakeId::from_i64(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if v > i64::MAX as u64 {
            return Err(de::Error::custom(
                "value overflows the signed 64-bit identifier range",
            ));
        }
        Ok(FlakeId::from_i64(v as i64))
    }
}
