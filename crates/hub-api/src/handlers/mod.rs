//! HTTP handlers for hub-api.

pub mod health;
pub mod search;
