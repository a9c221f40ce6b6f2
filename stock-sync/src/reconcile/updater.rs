//! Product updater: fetch, merge, guard, write
//!
//! The target API only accepts whole-document writes, so every product with
//! pending changes goes through one read-modify-write cycle per round:
//!
//! ```text
//! Fetch (GET product) ─▶ Merge (overwrite matched variants)
//!       │                     │
//!       ▼                     ▼ nothing matched
//!    Failed              NoMatchingVariants (no write)
//!                             │ ≥1 variant merged
//!                             ▼
//!                      Write (PATCH full document) ─▶ Updated | Failed
//! ```

use catalog_client::{ClientError, TargetCatalog};
use serde::Serialize;
use serde_json::Value;
use shared::{ProductDocument, RecordId, to_json_number};
use std::fmt;

use super::detector::PendingUpdate;

/// Step of the cycle that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStage {
    Fetch,
    Write,
}

impl fmt::Display for UpdateStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpdateStage::Fetch => write!(f, "fetch"),
            UpdateStage::Write => write!(f, "write"),
        }
    }
}

/// Result of one product's update cycle
#[derive(Debug)]
pub enum ProductUpdateOutcome {
    /// Document written back with this many variants merged
    Updated { variants: usize },
    /// None of the pending variants exist in the fetched document
    NoMatchingVariants,
    Failed {
        stage: UpdateStage,
        error: ClientError,
    },
}

/// Overwrite the fields of every pending variant found in the document.
///
/// Returns how many pending updates found their variant. Fields the policy
/// left out (`None`) are not touched.
pub fn merge_updates(document: &mut ProductDocument, updates: &[PendingUpdate]) -> usize {
    let Some(variants) = document.variants_mut() else {
        return 0;
    };

    let mut merged = 0;
    for update in updates {
        let found = variants.iter_mut().find_map(|variant| {
            let id = variant.get("id").and_then(RecordId::from_value)?;
            (id == update.variant_id)
                .then_some(variant)
                .and_then(Value::as_object_mut)
        });
        let Some(variant) = found else {
            tracing::debug!(variant_id = %update.variant_id, "Variant not found in product document");
            continue;
        };

        variant.insert("quantity".into(), to_json_number(update.quantity));
        if let Some(price) = update.price {
            variant.insert("price".into(), to_json_number(price));
        }
        if let Some(expense) = update.expense {
            variant.insert("expense".into(), to_json_number(expense));
        }
        merged += 1;
    }

    merged
}

/// Run the fetch-merge-write cycle for one product.
///
/// Failures are logged and reported, never propagated: the next round is the
/// retry.
pub async fn update_product(
    target: &dyn TargetCatalog,
    product_id: &RecordId,
    updates: &[PendingUpdate],
) -> ProductUpdateOutcome {
    let mut document = match target.get_product(product_id).await {
        Ok(document) => document,
        Err(error) => {
            tracing::error!(product_id = %product_id, error = %error, "Failed to fetch product");
            return ProductUpdateOutcome::Failed {
                stage: UpdateStage::Fetch,
                error,
            };
        }
    };

    let merged = merge_updates(&mut document, updates);
    if merged == 0 {
        tracing::warn!(
            product_id = %product_id,
            pending = updates.len(),
            "No pending variant found in product, skipping write"
        );
        return ProductUpdateOutcome::NoMatchingVariants;
    }

    if let Err(error) = target.replace_product(product_id, &document).await {
        tracing::error!(product_id = %product_id, error = %error, "Failed to write product");
        return ProductUpdateOutcome::Failed {
            stage: UpdateStage::Write,
            error,
        };
    }

    let details = serde_json::to_string(updates).unwrap_or_default();
    crate::audit_log!("replace_product", format!("product:{product_id}"), details);
    tracing::info!(product_id = %product_id, variants = merged, "Updated product");

    ProductUpdateOutcome::Updated { variants: merged }
}
