//! Change detection for matched variant pairs

use serde::Serialize;
use serde_json::Value;
use shared::{Decimal, RecordId, numeric};
use std::fmt;
use std::str::FromStr;

use super::matcher::MatchedPair;

/// Which fields are compared and written back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldPolicy {
    /// Quantity, price and expense
    #[default]
    Full,
    /// Quantity only, compared as whole units (fractions truncated)
    QuantityOnly,
}

impl FromStr for FieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "full" => Ok(FieldPolicy::Full),
            "quantity" | "quantity_only" => Ok(FieldPolicy::QuantityOnly),
            other => Err(format!("unknown field policy `{other}` (expected `all` or `quantity`)")),
        }
    }
}

impl fmt::Display for FieldPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldPolicy::Full => write!(f, "all"),
            FieldPolicy::QuantityOnly => write!(f, "quantity"),
        }
    }
}

/// Corrected values for one target variant
///
/// `price` and `expense` are `None` when the policy leaves them alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingUpdate {
    pub variant_id: RecordId,
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense: Option<Decimal>,
}

/// Result of comparing one matched pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Target already agrees with the source
    Unchanged,
    /// At least one field differs
    Changed(PendingUpdate),
    /// The source value of this field is not a number; nothing is written
    Ineligible { field: &'static str },
}

/// Compare a matched pair under the given policy.
///
/// The source quantity is clamped at zero. A target value that is not a
/// number always counts as different; a source value that is not a number
/// makes the pair ineligible.
pub fn detect(pair: &MatchedPair<'_>, policy: FieldPolicy) -> Detection {
    let source = pair.source;
    let target = pair.target;

    let Some(raw_quantity) = numeric(source.quantity.as_ref()) else {
        return Detection::Ineligible { field: "quantity" };
    };

    let (quantity, target_quantity) = match policy {
        FieldPolicy::Full => (raw_quantity, numeric(target.quantity.as_ref())),
        FieldPolicy::QuantityOnly => (
            raw_quantity.trunc(),
            numeric(target.quantity.as_ref()).map(|q| q.trunc()),
        ),
    };
    let quantity = quantity.max(Decimal::ZERO);
    let mut changed = target_quantity != Some(quantity);

    let (price, expense) = match policy {
        FieldPolicy::QuantityOnly => (None, None),
        FieldPolicy::Full => {
            let Some(price) = numeric(source.price.as_ref()) else {
                return Detection::Ineligible { field: "price" };
            };
            let Some(expense) = numeric(source.expense.as_ref()) else {
                return Detection::Ineligible { field: "expense" };
            };
            changed |= differs(price, target.price.as_ref());
            changed |= differs(expense, target.expense.as_ref());
            (Some(price), Some(expense))
        }
    };

    if !changed {
        return Detection::Unchanged;
    }

    Detection::Changed(PendingUpdate {
        variant_id: pair.variant_id.clone(),
        quantity,
        price,
        expense,
    })
}

fn differs(corrected: Decimal, current: Option<&Value>) -> bool {
    numeric(current) != Some(corrected)
}
