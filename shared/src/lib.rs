//! Shared types for the stock sync workspace
//!
//! Catalog models for both sides of the sync, the identifier type of the
//! target catalog, and the numeric coercion both sides are compared under.

pub mod models;
pub mod numeric;
pub mod types;
pub mod util;

// Re-exports
pub use models::{ProductDocument, SourceProduct, SourceVariant, TargetProduct, TargetVariant};
pub use numeric::{numeric, to_json_number};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
pub use types::{RecordId, Timestamp};
