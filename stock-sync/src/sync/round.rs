//! One sync round: fetch both catalogs, diff, batch, apply

use catalog_client::{SourceCatalog, SourceClient, TargetCatalog, TargetClient};
use serde::Serialize;
use shared::{RecordId, SourceProduct, TargetProduct, Timestamp};
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::core::{Config, SyncResult};
use crate::reconcile::{
    FieldPolicy, ProductUpdateOutcome, UpdateBatch, UpdateStage, match_variants, update_product,
};

/// Per-round behaviour switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RoundOptions {
    pub policy: FieldPolicy,
    /// Compute and log the batch, write nothing
    pub dry_run: bool,
}

/// Why a round stopped before diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    EmptySource,
    EmptyTarget,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::EmptySource => write!(f, "source catalog is empty"),
            SkipReason::EmptyTarget => write!(f, "target catalog is empty"),
        }
    }
}

/// A product whose update cycle failed; retried by the next round
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductFailure {
    pub product_id: RecordId,
    pub stage: UpdateStage,
    pub error: String,
}

/// Counters of a completed round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoundReport {
    pub started_at: Timestamp,
    pub duration_ms: u64,
    pub source_products: usize,
    pub target_products: usize,
    pub matched_pairs: usize,
    pub ineligible_pairs: usize,
    pub pending_updates: usize,
    pub products_in_batch: usize,
    pub products_updated: usize,
    /// Variants merged into the written documents
    pub variants_updated: usize,
    pub products_unchanged: usize,
    pub failures: Vec<ProductFailure>,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Not enough data to compare; nothing was diffed or written
    Skipped {
        reason: SkipReason,
        source_products: usize,
        target_products: usize,
    },
    Completed(RoundReport),
}

/// Reconciliation engine bound to its two catalogs
#[derive(Clone)]
pub struct SyncEngine {
    source: Arc<dyn SourceCatalog>,
    target: Arc<dyn TargetCatalog>,
    options: RoundOptions,
}

impl SyncEngine {
    pub fn new(
        source: Arc<dyn SourceCatalog>,
        target: Arc<dyn TargetCatalog>,
        options: RoundOptions,
    ) -> Self {
        Self {
            source,
            target,
            options,
        }
    }

    /// Build the HTTP-backed engine described by the configuration
    pub fn from_config(config: &Config) -> SyncResult<Self> {
        let source = SourceClient::new(&config.source_config())?;
        let target = TargetClient::new(config.target_config())?;
        Ok(Self::new(
            Arc::new(source),
            Arc::new(target),
            RoundOptions {
                policy: config.field_policy,
                dry_run: config.dry_run,
            },
        ))
    }

    pub fn options(&self) -> RoundOptions {
        self.options
    }

    /// Source catalog, or empty when it cannot be read
    pub async fn fetch_source(&self) -> Vec<SourceProduct> {
        match self.source.fetch_products().await {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch source catalog");
                Vec::new()
            }
        }
    }

    /// Target catalog, or empty when any page fails
    ///
    /// A partial catalog is never used: diffing against it would treat every
    /// product on the missing pages as absent.
    pub async fn fetch_target(&self) -> Vec<TargetProduct> {
        match self.target.fetch_all_products().await {
            Ok(products) => products,
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch target catalog");
                Vec::new()
            }
        }
    }

    /// Run one complete round
    pub async fn run_round(&self) -> RoundOutcome {
        let started = Instant::now();
        let started_at = shared::util::now_millis();

        let source = self.fetch_source().await;
        tracing::info!(count = source.len(), "Fetched source products");
        let target = self.fetch_target().await;
        tracing::info!(count = target.len(), "Fetched target products");

        let skip = if source.is_empty() {
            Some(SkipReason::EmptySource)
        } else if target.is_empty() {
            Some(SkipReason::EmptyTarget)
        } else {
            None
        };
        if let Some(reason) = skip {
            tracing::warn!(%reason, "Not enough data to compare, skipping round");
            return RoundOutcome::Skipped {
                reason,
                source_products: source.len(),
                target_products: target.len(),
            };
        }

        let pairs = match_variants(&source, &target);
        let batch = UpdateBatch::from_pairs(&pairs, self.options.policy);
        if batch.is_empty() {
            tracing::info!(matched = pairs.len(), "Target already matches source");
        } else {
            tracing::info!(
                matched = pairs.len(),
                products = batch.len(),
                variants = batch.update_count(),
                "Found differences"
            );
        }

        let mut report = RoundReport {
            started_at,
            source_products: source.len(),
            target_products: target.len(),
            matched_pairs: pairs.len(),
            ineligible_pairs: batch.ineligible(),
            pending_updates: batch.update_count(),
            products_in_batch: batch.len(),
            dry_run: self.options.dry_run,
            ..Default::default()
        };

        self.apply(&batch, &mut report).await;

        report.duration_ms = started.elapsed().as_millis() as u64;
        RoundOutcome::Completed(report)
    }

    /// Apply the batch one product at a time; a failure only affects its product
    async fn apply(&self, batch: &UpdateBatch, report: &mut RoundReport) {
        for (product_id, updates) in batch.iter() {
            if self.options.dry_run {
                tracing::info!(
                    product_id = %product_id,
                    updates = %serde_json::to_string(updates).unwrap_or_default(),
                    "Dry run, not writing product"
                );
                continue;
            }

            match update_product(self.target.as_ref(), product_id, updates).await {
                ProductUpdateOutcome::Updated { variants } => {
                    report.products_updated += 1;
                    report.variants_updated += variants;
                }
                ProductUpdateOutcome::NoMatchingVariants => report.products_unchanged += 1,
                ProductUpdateOutcome::Failed { stage, error } => {
                    report.failures.push(ProductFailure {
                        product_id: product_id.clone(),
                        stage,
                        error: error.to_string(),
                    });
                }
            }
        }
    }
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use catalog_client::{ClientError, ClientResult};
    use serde_json::{Value, json};
    use shared::{ProductDocument, RecordId};
    use std::collections::{BTreeMap, HashSet};
    use std::sync::Mutex;

    struct FakeSource {
        products: Option<Value>,
    }

    #[async_trait]
    impl SourceCatalog for FakeSource {
        async fn fetch_products(&self) -> ClientResult<Vec<SourceProduct>> {
            match &self.products {
                Some(products) => Ok(serde_json::from_value(products.clone())?),
                None => Err(ClientError::DataShape("source down".into())),
            }
        }
    }

    #[derive(Default)]
    struct FakeTarget {
        documents: Mutex<BTreeMap<RecordId, Value>>,
        /// Listing served instead of the stored documents
        listing: Option<Value>,
        listing_fails: bool,
        fail_get: HashSet<RecordId>,
        fail_write: HashSet<RecordId>,
        gets: Mutex<Vec<RecordId>>,
        writes: Mutex<Vec<(RecordId, Value)>>,
    }

    impl FakeTarget {
        fn with_documents(documents: Value) -> Self {
            let documents = documents
                .as_array()
                .unwrap()
                .iter()
                .map(|doc| (RecordId::from_value(&doc["id"]).unwrap(), doc.clone()))
                .collect();
            Self {
                documents: Mutex::new(documents),
                ..Default::default()
            }
        }

        fn writes(&self) -> Vec<(RecordId, Value)> {
            self.writes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TargetCatalog for FakeTarget {
        async fn fetch_all_products(&self) -> ClientResult<Vec<TargetProduct>> {
            if self.listing_fails {
                return Err(ClientError::DataShape("page 3 failed".into()));
            }
            let listing = match &self.listing {
                Some(listing) => listing.clone(),
                None => Value::Array(self.documents.lock().unwrap().values().cloned().collect()),
            };
            Ok(serde_json::from_value(listing)?)
        }

        async fn get_product(&self, id: &RecordId) -> ClientResult<ProductDocument> {
            self.gets.lock().unwrap().push(id.clone());
            if self.fail_get.contains(id) {
                return Err(ClientError::DataShape(format!("product {id} unavailable")));
            }
            let documents = self.documents.lock().unwrap();
            let document = documents
                .get(id)
                .cloned()
                .ok_or_else(|| ClientError::DataShape(format!("product {id} not found")))?;
            ProductDocument::from_value(document)
                .ok_or_else(|| ClientError::DataShape("not an object".into()))
        }

        async fn replace_product(&self, id: &RecordId, document: &ProductDocument) -> ClientResult<()> {
            if self.fail_write.contains(id) {
                return Err(ClientError::DataShape(format!("product {id} rejected")));
            }
            let value = document.clone().into_value();
            self.writes.lock().unwrap().push((id.clone(), value.clone()));
            self.documents.lock().unwrap().insert(id.clone(), value);
            Ok(())
        }
    }

    fn engine(source: FakeSource, target: Arc<FakeTarget>, options: RoundOptions) -> SyncEngine {
        SyncEngine::new(Arc::new(source), target, options)
    }

    fn completed(outcome: RoundOutcome) -> RoundReport {
        match outcome {
            RoundOutcome::Completed(report) => report,
            other => panic!("expected completed round, got {other:?}"),
        }
    }

    fn three_products() -> (FakeSource, FakeTarget) {
        let source = FakeSource {
            products: Some(json!([{"variants": [
                {"slug": "A", "quantity": 1, "price": 10, "expense": 5},
                {"slug": "B", "quantity": 2, "price": 10, "expense": 5},
                {"slug": "C", "quantity": 3, "price": 10, "expense": 5}
            ]}])),
        };
        let target = FakeTarget::with_documents(json!([
            {"id": 1, "variants": [{"id": 11, "taager_code": "A", "quantity": 0, "price": 10, "expense": 5}]},
            {"id": 2, "variants": [{"id": 21, "taager_code": "B", "quantity": 0, "price": 10, "expense": 5}]},
            {"id": 3, "variants": [{"id": 31, "taager_code": "C", "quantity": 0, "price": 10, "expense": 5}]}
        ]));
        (source, target)
    }

    #[tokio::test]
    async fn test_round_updates_changed_variant() {
        let source = FakeSource {
            products: Some(json!([{"id": "P1", "variants": [
                {"slug": "ABC", "quantity": 7, "price": 10, "expense": 4}
            ]}])),
        };
        let target = Arc::new(FakeTarget::with_documents(json!([{
            "id": 42,
            "name": "Mug",
            "variants": [
                {"id": 9, "taager_code": "ABC", "quantity": 3, "price": 10, "expense": 4},
                {"id": 10, "taager_code": "XYZ", "quantity": 1, "price": 5, "expense": 2}
            ]
        }])));

        let report = completed(
            engine(source, target.clone(), RoundOptions::default())
                .run_round()
                .await,
        );

        assert_eq!(report.matched_pairs, 1);
        assert_eq!(report.pending_updates, 1);
        assert_eq!(report.products_updated, 1);
        assert_eq!(report.variants_updated, 1);
        assert_eq!(*target.gets.lock().unwrap(), vec![RecordId::from(42)]);

        let writes = target.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, RecordId::from(42));
        assert_eq!(
            writes[0].1,
            json!({
                "id": 42,
                "name": "Mug",
                "variants": [
                    {"id": 9, "taager_code": "ABC", "quantity": 7, "price": 10, "expense": 4},
                    {"id": 10, "taager_code": "XYZ", "quantity": 1, "price": 5, "expense": 2}
                ]
            })
        );
    }

    #[tokio::test]
    async fn test_failed_product_does_not_block_others() {
        let (source, mut target) = three_products();
        target.fail_get.insert(RecordId::from(2));
        let target = Arc::new(target);

        let report = completed(
            engine(source, target.clone(), RoundOptions::default())
                .run_round()
                .await,
        );

        assert_eq!(report.products_in_batch, 3);
        assert_eq!(report.products_updated, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].product_id, RecordId::from(2));
        assert_eq!(report.failures[0].stage, UpdateStage::Fetch);
        let written: Vec<_> = target.writes().into_iter().map(|(id, _)| id).collect();
        assert_eq!(written, vec![RecordId::from(1), RecordId::from(3)]);
    }

    #[tokio::test]
    async fn test_failed_write_does_not_block_others() {
        let (source, mut target) = three_products();
        target.fail_write.insert(RecordId::from(2));
        let target = Arc::new(target);

        let report = completed(
            engine(source, target.clone(), RoundOptions::default())
                .run_round()
                .await,
        );

        assert_eq!(report.products_updated, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].product_id, RecordId::from(2));
        assert_eq!(report.failures[0].stage, UpdateStage::Write);
        assert!(report.failures[0].error.contains("rejected"));
        assert_eq!(target.gets.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_second_round_is_a_no_op() {
        let (source, target) = three_products();
        let target = Arc::new(target);
        let engine = engine(source, target.clone(), RoundOptions::default());

        let first = completed(engine.run_round().await);
        assert_eq!(first.products_updated, 3);

        let second = completed(engine.run_round().await);
        assert_eq!(second.matched_pairs, 3);
        assert_eq!(second.pending_updates, 0);
        assert_eq!(target.writes().len(), 3);
    }

    #[tokio::test]
    async fn test_empty_source_skips_round() {
        let (_, target) = three_products();
        let target = Arc::new(target);

        let outcome = engine(FakeSource { products: None }, target.clone(), RoundOptions::default())
            .run_round()
            .await;

        assert_eq!(
            outcome,
            RoundOutcome::Skipped {
                reason: SkipReason::EmptySource,
                source_products: 0,
                target_products: 3,
            }
        );
        assert!(target.writes().is_empty());
    }

    #[tokio::test]
    async fn test_target_listing_failure_skips_round() {
        let (source, mut target) = three_products();
        target.listing_fails = true;
        let target = Arc::new(target);

        let outcome = engine(source, target.clone(), RoundOptions::default())
            .run_round()
            .await;

        assert!(matches!(
            outcome,
            RoundOutcome::Skipped {
                reason: SkipReason::EmptyTarget,
                ..
            }
        ));
        assert!(target.gets.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_vanished_variant_is_not_written() {
        let source = FakeSource {
            products: Some(json!([{"variants": [{"slug": "A", "quantity": 5, "price": 1, "expense": 1}]}])),
        };
        let mut target = FakeTarget::with_documents(json!([
            {"id": 1, "variants": [{"id": 99, "taager_code": "A", "quantity": 0, "price": 1, "expense": 1}]}
        ]));
        // Listing still shows variant 11, which was removed before the fetch
        target.listing = Some(json!([
            {"id": 1, "variants": [{"id": 11, "taager_code": "A", "quantity": 0, "price": 1, "expense": 1}]}
        ]));
        let target = Arc::new(target);

        let report = completed(
            engine(source, target.clone(), RoundOptions::default())
                .run_round()
                .await,
        );

        assert_eq!(report.products_unchanged, 1);
        assert_eq!(report.products_updated, 0);
        assert!(target.writes().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_writes_nothing() {
        let (source, target) = three_products();
        let target = Arc::new(target);
        let options = RoundOptions {
            dry_run: true,
            ..Default::default()
        };

        let report = completed(engine(source, target.clone(), options).run_round().await);

        assert!(report.dry_run);
        assert_eq!(report.pending_updates, 3);
        assert_eq!(report.products_updated, 0);
        assert!(target.gets.lock().unwrap().is_empty());
        assert!(target.writes().is_empty());
    }

    #[tokio::test]
    async fn test_quantity_only_policy_leaves_prices() {
        let source = FakeSource {
            products: Some(json!([{"variants": [{"slug": "A", "quantity": -2, "price": 99, "expense": 50}]}])),
        };
        let target = Arc::new(FakeTarget::with_documents(json!([
            {"id": 1, "variants": [{"id": 11, "taager_code": "A", "quantity": 4, "price": 10, "expense": 5}]}
        ])));
        let options = RoundOptions {
            policy: FieldPolicy::QuantityOnly,
            dry_run: false,
        };

        completed(engine(source, target.clone(), options).run_round().await);

        let writes = target.writes();
        assert_eq!(
            writes[0].1["variants"][0],
            json!({"id": 11, "taager_code": "A", "quantity": 0, "price": 10, "expense": 5})
        );
    }
}
