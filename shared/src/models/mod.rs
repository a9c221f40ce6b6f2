//! Data models
//!
//! Catalog records as the two external systems publish them. Every field the
//! reconciliation does not rely on is optional: both APIs are loose about
//! shapes, and a single odd record must not poison a whole catalog.

pub mod source;
pub mod target;

// Re-exports
pub use source::*;
pub use target::*;

use crate::types::RecordId;
use serde::{Deserialize, Deserializer};

/// `null` or a missing field deserializes as the type's default
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Raw field value; an explicit `null` is kept as `Some(Value::Null)`
///
/// Pair with `#[serde(default)]` so only an absent field becomes `None`.
pub(crate) fn present<'de, D>(deserializer: D) -> Result<Option<serde_json::Value>, D::Error>
where
    D: Deserializer<'de>,
{
    serde_json::Value::deserialize(deserializer).map(Some)
}

/// Matching code: a non-empty string, or a number in its decimal text form
pub(crate) fn matching_code<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Record id, `None` when absent or unusable
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<RecordId>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(RecordId::from_value(&value))
}
