//! Core: configuration, errors and background task management

pub mod config;
pub mod error;
pub mod tasks;

pub use config::{Config, ConfigError};
pub use error::{SyncError, SyncResult};
pub use tasks::{BackgroundTasks, TaskKind};
