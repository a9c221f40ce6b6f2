//! Stock Sync - source-to-storefront inventory reconciliation
//!
//! # Overview
//!
//! Periodically reads the authoritative source catalog and the storefront
//! (target) catalog, links their variants through the shared external code
//! (`slug` / `taager_code`), and writes corrected quantity, price and expense
//! values back to the storefront, one whole product document at a time.
//!
//! # Module layout
//!
//! ```text
//! stock-sync/src/
//! ├── core/          # configuration, errors, background tasks
//! ├── reconcile/     # matcher, change detector, batcher, product updater
//! ├── sync/          # one sync round, the periodic worker
//! └── utils/         # logging
//! ```

pub mod core;
pub mod reconcile;
pub mod sync;
pub mod utils;

pub use core::{BackgroundTasks, Config, ConfigError, SyncError, SyncResult, TaskKind};
pub use reconcile::{FieldPolicy, PendingUpdate, UpdateBatch};
pub use sync::{RoundOptions, RoundOutcome, RoundReport, SkipReason, SyncEngine, SyncWorker};

pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};
