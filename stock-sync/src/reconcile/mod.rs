//! Reconciliation engine
//!
//! ```text
//! source catalog ─┐
//!                 ├─▶ match_variants ─▶ detect ─▶ UpdateBatch ─▶ update_product (per product)
//! target catalog ─┘
//! ```
//!
//! Everything up to the batch is pure; only the updater talks to the target.

pub mod batch;
pub mod detector;
pub mod matcher;
pub mod updater;

pub use batch::UpdateBatch;
pub use detector::{Detection, FieldPolicy, PendingUpdate, detect};
pub use matcher::{MatchedPair, match_variants};
pub use updater::{ProductUpdateOutcome, UpdateStage, merge_updates, update_product};
