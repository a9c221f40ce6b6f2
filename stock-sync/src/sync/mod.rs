//! Sync loop: one round at a time, forever

pub mod round;
pub mod worker;

pub use round::{ProductFailure, RoundOptions, RoundOutcome, RoundReport, SkipReason, SyncEngine};
pub use worker::SyncWorker;
