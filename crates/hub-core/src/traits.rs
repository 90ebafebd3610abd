//! Core traits for pluggable search execution.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::ContentRecord;
use crate::search::SearchPlan;

/// Runs a [`SearchPlan`] against a content store.
///
/// Implementations must apply the plan's access predicate, id restriction,
/// ordering (rank descending) and limit. Callers still re-check access on
/// the returned rows.
#[async_trait]
pub trait SearchStrategy: Send + Sync {
    /// Short name used in logs and health output.
    fn name(&self) -> &'static str;

    /// Execute the plan. Errors are all-or-nothing; no partial results.
    async fn search(&self, plan: &SearchPlan) -> Result<Vec<ContentRecord>>;
}
