//! # hub-core
//!
//! Core types, traits, and access rules for the content-hub search service.
//!
//! This crate provides the data structures shared by the database layer,
//! the search engine, and the HTTP API, plus the visibility rules that decide
//! which content a caller is allowed to see.

pub mod access;
pub mod error;
pub mod models;
pub mod search;
pub mod traits;

// Re-export commonly used types at crate root
pub use access::{Caller, VisibilityScope};
pub use error::{Error, Result};
pub use models::*;
pub use search::*;
pub use traits::*;
