//! Serde helpers for protobuf `int64` fields.
//!
//! The JSON mapping of protobuf encodes 64-bit integers as strings, but
//! some responses (and hand-written fixtures) carry plain numbers. Both
//! forms are accepted on input; output always uses the string form.

use serde::{Deserialize, Deserializer, Serializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Int64Repr {
    Number(i64),
    Text(String),
}

impl Int64Repr {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            Int64Repr::Number(n) => Ok(n),
            Int64Repr::Text(s) => s
                .parse()
                .map_err(|_| E::custom(format!("invalid int64 value '{s}'"))),
        }
    }
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    Int64Repr::deserialize(deserializer)?.into_i64()
}

pub fn serialize<S: Serializer>(value: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// Same as the parent module, for optional fields.
pub mod option {
    use super::*;

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<i64>, D::Error> {
        match Option::<Int64Repr>::deserialize(deserializer)? {
            Some(repr) => repr.into_i64().map(Some),
            None => Ok(None),
        }
    }

    pub fn serialize<S: Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(n) => serializer.serialize_some(&n.to_string()),
            None => serializer.serialize_none(),
        }
    }
}
