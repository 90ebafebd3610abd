//! # hub-search
//!
//! Advanced search for content-hub.
//!
//! This crate provides:
//! - Translation of user query syntax (`AND`, `OR`, `NOT`, phrases,
//!   prefixes) into Postgres `tsquery` text
//! - An access-controlled search engine over a pluggable strategy
//! - JSON and CSV renderings of results
//!
//! ## Example
//!
//! ```ignore
//! use hub_search::{AdvancedSearchEngine, AdvancedSearchRequest, SearchMode};
//! use hub_db::{Database, PoolConfig};
//!
//! let db = Database::connect("postgres://...", &PoolConfig::default()).await?;
//! let engine = AdvancedSearchEngine::from_database(&db, SearchMode::from_env()?);
//!
//! let results = engine
//!     .execute(&AdvancedSearchRequest::new("\"aws lambda\" OR serverless", caller))
//!     .await?;
//! ```

pub mod config;
pub mod executor;
pub mod format;
pub mod translator;

pub use config::SearchMode;
pub use executor::{AdvancedSearchEngine, AdvancedSearchRequest};
pub use format::{
    to_csv, AuthorItem, OutputFormat, SearchResultItem, SearchResults, CSV_CONTENT_DISPOSITION,
    CSV_CONTENT_TYPE, CSV_HEADER,
};
pub use translator::translate;
