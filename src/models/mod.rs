use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub mod asset;
pub mod content;
pub mod page;
pub mod settings;

// ── Lenient row decoding ──
// Hosted rows may carry explicit nulls where the local schema has defaults.
// One such row must not sink the whole batch.

/// `null` (or a missing field, with `#[serde(default)]`) becomes `T::default()`.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Row ids arrive as strings (uuid) or integers (serial keys).
pub(crate) fn id_as_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!("unexpected id {}", other))),
    }
}
