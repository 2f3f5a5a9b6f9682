//! Field adapters that coerce malformed document fields to defaults.
//!
//! Used with `#[serde(default, deserialize_with = "...")]` so one bad field
//! never rejects a whole preset.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode `T`, or fall back to `T::default()` with a warning.
pub fn lenient<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let raw = Value::deserialize(d)?;
    Ok(coerce(raw))
}

pub(crate) fn coerce<T: DeserializeOwned + Default>(raw: Value) -> T {
    match serde_json::from_value::<T>(raw) {
        Ok(v) => v,
        Err(e) => {
            log::warn!(
                "[preset] malformed {} field, using default: {}",
                std::any::type_name::<T>(),
                e
            );
            T::default()
        }
    }
}

/// Numbers, numeric strings, or nothing.
pub fn lenient_number<'de, D>(d: D) -> Result<Option<f32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Value::deserialize(d)?;
    Ok(number(&raw))
}

pub(crate) fn number(raw: &Value) -> Option<f32> {
    match raw {
        Value::Number(n) => n.as_f64().map(|v| v as f32).filter(|v| v.is_finite()),
        Value::String(s) => s.trim().parse::<f32>().ok().filter(|v| v.is_finite()),
        Value::Null => None,
        other => {
            log::warn!("[preset] expected a number, got {}", other);
            None
        }
    }
}

/// Maps whose malformed entries are dropped one by one.
pub fn lenient_map<'de, D, T>(d: D) -> Result<std::collections::BTreeMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(d)?;
    let Value::Object(entries) = raw else {
        if !raw.is_null() {
            log::warn!("[preset] expected an object, got {}", raw);
        }
        return Ok(Default::default());
    };
    let mut out = std::collections::BTreeMap::new();
    for (k, v) in entries {
        match serde_json::from_value::<T>(v) {
            Ok(item) => {
                out.insert(k, item);
            }
            Err(e) => log::warn!("[preset] dropping entry {:?}: {}", k, e),
        }
    }
    Ok(out)
}

/// Lists whose malformed items are dropped one by one.
pub fn lenient_list<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Value::deserialize(d)?;
    Ok(list(raw))
}

pub(crate) fn list<T: DeserializeOwned>(raw: Value) -> Vec<T> {
    let Value::Array(items) = raw else {
        if !raw.is_null() {
            log::warn!("[preset] expected a list, got {}", raw);
        }
        return Vec::new();
    };
    items
        .into_iter()
        .filter_map(|v| match serde_json::from_value::<T>(v) {
            Ok(item) => Some(item),
            Err(e) => {
                log::warn!("[preset] dropping list item: {}", e);
                None
            }
        })
        .collect()
}
