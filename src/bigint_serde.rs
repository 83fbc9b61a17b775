//! `serde(with = "crate::bigint_serde")` support: [`rug::Integer`] as a
//! decimal string on the wire, per the persisted formats in spec.md §6.
//!
//! Parsing is strict: any non-decimal content is rejected rather than
//! silently truncated.

use rug::Integer;
use serde::{Deserialize, Deserializer, Serializer};
use serde::de::Error as _;

/// Serialize an [`Integer`] as a decimal string.
pub fn serialize<S: Serializer>(value: &Integer, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_string())
}

/// Deserialize an [`Integer`] from a decimal string, rejecting anything
/// that isn't a valid base-10 integer literal.
pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Integer, D::Error> {
    let s = String::deserialize(deserializer)?;
    Integer::parse(&s)
        .map(Integer::from)
        .map_err(|e| D::Error::custom(format!("invalid decimal big integer {s:?}: {e}")))
}

#[cfg(test)]
mod test {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Wrapper(#[serde(with = "super")] Integer);

    #[test]
    fn round_trips_through_json() {
        let original = Wrapper(Integer::from_str_radix("123456789012345678901234567890", 10).unwrap());
        let json = serde_json::to_string(&original).unwrap();
        assert_eq!(json, "\"123456789012345678901234567890\"");
        let restored: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(original, restored);
    }

    #[test]
    fn rejects_non_decimal() {
        let err = serde_json::from_str::<Wrapper>("\"not a number\"");
        assert!(err.is_err());
    }
}
