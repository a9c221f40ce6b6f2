//! Target catalog models (storefront)

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::RecordId;

/// Product as listed by the target catalog
///
/// Only the listing view used for matching. Write-backs work on the raw
/// document instead, since the target API replaces the whole product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetProduct {
    #[serde(default, deserialize_with = "super::lenient_id")]
    pub id: Option<RecordId>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub variants: Vec<TargetVariant>,
}

/// Variant of a target product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetVariant {
    #[serde(default, deserialize_with = "super::lenient_id")]
    pub id: Option<RecordId>,
    /// External matching code, same value space as `SourceVariant::slug`
    #[serde(default, deserialize_with = "super::matching_code")]
    pub taager_code: Option<String>,
    #[serde(default, deserialize_with = "super::present")]
    pub quantity: Option<Value>,
    #[serde(default, deserialize_with = "super::present")]
    pub price: Option<Value>,
    #[serde(default, deserialize_with = "super::present")]
    pub expense: Option<Value>,
}

/// Full target product document, as fetched for a write-back
///
/// Unknown fields are carried through untouched so the replace request sends
/// back exactly what was read, plus the merged variant changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductDocument(Map<String, Value>);

impl ProductDocument {
    /// Wrap a raw payload, `None` unless it is a JSON object
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) => Some(Self(fields)),
            _ => None,
        }
    }

    /// Raw variant list, `None` when the document carries no variant array
    pub fn variants_mut(&mut self) -> Option<&mut Vec<Value>> {
        self.0.get_mut("variants").and_then(Value::as_array_mut)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}
