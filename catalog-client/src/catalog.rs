//! Catalog access traits
//!
//! The reconciliation engine talks to both systems only through these traits,
//! so rounds can be driven against in-memory catalogs in tests.

use async_trait::async_trait;
use shared::{ProductDocument, RecordId, SourceProduct, TargetProduct};

use crate::ClientResult;

/// Read access to the authoritative catalog
#[async_trait]
pub trait SourceCatalog: Send + Sync {
    /// Fetch the complete source catalog in one call
    async fn fetch_products(&self) -> ClientResult<Vec<SourceProduct>>;
}

/// Read/write access to the storefront catalog
#[async_trait]
pub trait TargetCatalog: Send + Sync {
    /// Fetch the complete target catalog, following pagination to the end
    async fn fetch_all_products(&self) -> ClientResult<Vec<TargetProduct>>;

    /// Fetch one full product document
    async fn get_product(&self, id: &RecordId) -> ClientResult<ProductDocument>;

    /// Replace a product with the given full document
    async fn replace_product(&self, id: &RecordId, document: &ProductDocument) -> ClientResult<()>;
}
