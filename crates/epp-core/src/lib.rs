//! Versioned enhanced-preprint articles
//!
//! - Model: `EnhancedArticle` records grouped into version sets by `msid`
//! - Repository: the `ArticleRepository` contract, provided for every raw
//!   `ArticleStore` backend so version resolution is written once
//! - Backends: an explicit in-memory store and a SQLite store
//! - Ingestion: payload validation with full content paths, ORCID helpers

pub mod config;
pub mod dates;
pub mod identifiers;
pub mod listing;
pub mod memory_store;
pub mod model;
pub mod resolve;
pub mod store;
pub mod validation;

#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub use config::*;
pub use dates::parse_date;
pub use identifiers::*;
pub use listing::*;
pub use memory_store::InMemoryArticleStore;
pub use model::*;
pub use resolve::*;
pub use store::*;
pub use validation::*;

#[cfg(feature = "sqlite")]
pub use sqlite_store::SqliteArticleStore;

pub use epp_content::Content;
