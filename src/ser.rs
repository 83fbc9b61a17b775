//! Small serde helpers shared by the wire types (component C/I).

/// `serde(with = "crate::ser::int_pair")`: a `(Integer, Integer)` pair as
/// a two-element array of decimal strings, matching the `[dec, dec]`
/// wire shape for `a`/`e`/`z` in spec.md §6.
pub mod int_pair {
    use rug::Integer;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Dec(#[serde(with = "crate::bigint_serde")] Integer);

    pub fn serialize<S: Serializer>(
        value: &(Integer, Integer),
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        [Dec(value.0.clone()), Dec(value.1.clone())].serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<(Integer, Integer), D::Error> {
        let [a, b]: [Dec; 2] = Deserialize::deserialize(deserializer)?;
        if a.0 < 0 || b.0 < 0 {
            return Err(D::Error::custom("proof component must be non-negative"));
        }
        Ok((a.0, b.0))
    }
}
