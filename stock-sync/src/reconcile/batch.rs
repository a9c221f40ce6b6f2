//! Grouping of detected changes by target product

use shared::RecordId;
use std::collections::BTreeMap;

use super::detector::{Detection, FieldPolicy, PendingUpdate, detect};
use super::matcher::MatchedPair;

/// Pending updates of one sync round, keyed by target product id
///
/// Built fresh every round and dropped once applied. A product only appears
/// with at least one pending update.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UpdateBatch {
    products: BTreeMap<RecordId, Vec<PendingUpdate>>,
    /// Pairs dropped because a source value was not a number
    ineligible: usize,
}

impl UpdateBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run detection over every matched pair and group the changes
    pub fn from_pairs(pairs: &[MatchedPair<'_>], policy: FieldPolicy) -> Self {
        let mut batch = Self::new();

        for pair in pairs {
            match detect(pair, policy) {
                Detection::Unchanged => {}
                Detection::Changed(update) => batch.push(pair.product_id.clone(), update),
                Detection::Ineligible { field } => {
                    tracing::warn!(
                        product_id = %pair.product_id,
                        variant_id = %pair.variant_id,
                        code = pair.source.slug.as_deref().unwrap_or_default(),
                        field,
                        "Source value is not a number, skipping variant"
                    );
                    batch.ineligible += 1;
                }
            }
        }

        batch
    }

    pub fn push(&mut self, product_id: RecordId, update: PendingUpdate) {
        self.products.entry(product_id).or_default().push(update);
    }

    /// Number of products to update
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Number of variant updates across all products
    pub fn update_count(&self) -> usize {
        self.products.values().map(Vec::len).sum()
    }

    pub fn ineligible(&self) -> usize {
        self.ineligible
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RecordId, &[PendingUpdate])> {
        self.products.iter().map(|(id, updates)| (id, updates.as_slice()))
    }
}
