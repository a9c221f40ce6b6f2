//! Catalog Client - HTTP clients for the source and target catalogs
//!
//! Provides the network side of the stock sync: one-shot reads of the source
//! catalog, paged reads of the target catalog, and whole-document writes back
//! to the target.

pub mod catalog;
pub mod config;
pub mod error;
mod http;
pub mod source;
pub mod target;

pub use catalog::{SourceCatalog, TargetCatalog};
pub use config::{SourceConfig, TargetConfig};
pub use error::{ClientError, ClientResult};
pub use source::SourceClient;
pub use target::{API_KEY_HEADER, TargetClient};
