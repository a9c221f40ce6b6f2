//! Source catalog models (authoritative inventory)

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Product as returned by the source catalog
///
/// Descriptive fields (name, images, ...) are not read and never fail a parse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceProduct {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub variants: Vec<SourceVariant>,
}

/// Variant of a source product
///
/// Numeric fields are kept raw and coerced with [`crate::numeric::numeric`]
/// at comparison time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceVariant {
    /// External matching code, joins to `TargetVariant::taager_code`
    #[serde(default, deserialize_with = "super::matching_code")]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "super::present")]
    pub quantity: Option<Value>,
    #[serde(default, deserialize_with = "super::present")]
    pub price: Option<Value>,
    /// Unit cost
    #[serde(default, deserialize_with = "super::present")]
    pub expense: Option<Value>,
}
