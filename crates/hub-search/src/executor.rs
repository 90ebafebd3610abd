//! Advanced search execution.
//!
//! The engine turns a request into a [`SearchPlan`], hands it to the
//! configured [`SearchStrategy`], and post-processes the rows: it re-checks
//! the access and id predicates, orders by relevance and applies the cap.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use hub_core::{
    Caller, ContentRecord, Error, Result, SearchPlan, SearchResultSet, SearchStrategy,
    VisibilityScope, ADVANCED_SEARCH_LIMIT,
};
use hub_db::Database;

use crate::config::SearchMode;
use crate::translator::translate;

/// One advanced search call.
#[derive(Debug, Clone)]
pub struct AdvancedSearchRequest {
    pub query: String,
    pub caller: Caller,
    /// Restrict results to these ids ("search within results").
    pub restrict_to_ids: Option<Vec<Uuid>>,
}

impl AdvancedSearchRequest {
    pub fn new(query: impl Into<String>, caller: Caller) -> Self {
        Self {
            query: query.into(),
            caller,
            restrict_to_ids: None,
        }
    }

    pub fn within_ids(mut self, ids: Vec<Uuid>) -> Self {
        self.restrict_to_ids = Some(ids);
        self
    }
}

/// Access-controlled advanced search over a pluggable strategy.
#[derive(Clone)]
pub struct AdvancedSearchEngine {
    strategy: Arc<dyn SearchStrategy>,
}

impl AdvancedSearchEngine {
    pub fn new(strategy: Arc<dyn SearchStrategy>) -> Self {
        Self { strategy }
    }

    /// Engine backed by the Postgres strategy for `mode`.
    pub fn from_database(db: &Database, mode: SearchMode) -> Self {
        let strategy: Arc<dyn SearchStrategy> = match mode {
            SearchMode::FullText => Arc::new(db.fulltext.clone()),
            SearchMode::Substring => Arc::new(db.substring.clone()),
        };
        Self::new(strategy)
    }

    /// Name of the strategy in use.
    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Build the plan for a request without running it.
    pub fn plan(&self, request: &AdvancedSearchRequest) -> Result<SearchPlan> {
        if request.query.trim().is_empty() {
            return Err(Error::invalid_field("query", "Search query is required"));
        }

        Ok(SearchPlan {
            raw_query: request.query.clone(),
            ts_query: translate(&request.query),
            scope: VisibilityScope::for_caller(&request.caller),
            caller_id: request.caller.user_id,
            restrict_to_ids: request.restrict_to_ids.clone(),
            limit: ADVANCED_SEARCH_LIMIT,
        })
    }

    /// Run a search. Zero rows is a successful, empty result.
    #[instrument(skip(self, request), fields(
        subsystem = "search",
        component = "advanced_search",
        op = "execute",
        search_mode = self.strategy.name(),
    ))]
    pub async fn execute(&self, request: &AdvancedSearchRequest) -> Result<SearchResultSet> {
        let start = Instant::now();
        let plan = self.plan(request)?;
        debug!(
            query = %plan.raw_query,
            ts_query = %plan.ts_query,
            scope = ?plan.scope.levels(),
            restricted = plan.id_restriction().is_some(),
            "Search plan built"
        );

        let rows = match self.strategy.search(&plan).await {
            Ok(rows) => rows,
            Err(e) => {
                error!(
                    query = %plan.raw_query,
                    search_mode = self.strategy.name(),
                    error = %e,
                    "Advanced search failed"
                );
                return Err(e);
            }
        };

        let results = finalize(&plan, rows);

        info!(
            query = %plan.raw_query,
            result_count = results.len(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Advanced search completed"
        );

        Ok(SearchResultSet { results })
    }
}

/// Drop rows the plan does not admit, order by rank and cap.
fn finalize(plan: &SearchPlan, rows: Vec<ContentRecord>) -> Vec<ContentRecord> {
    let returned = rows.len();
    let mut results: Vec<ContentRecord> = rows.into_iter().filter(|r| plan.admits(r)).collect();

    let rejected = returned - results.len();
    if rejected > 0 {
        warn!(
            rejected = rejected,
            returned = returned,
            "Strategy returned rows outside the access predicate; dropped"
        );
    }

    // sort_by is stable, so equal ranks keep strategy order
    results.sort_by(|a, b| rank_desc(a.rank, b.rank));
    results.truncate(plan.limit.max(0) as usize);
    results
}

fn rank_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    let a = a.unwrap_or(f64::NEG_INFINITY);
    let b = b.unwrap_or(f64::NEG_INFINITY);
    b.total_cmp(&a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::Utc;
    use hub_core::{ContentType, Visibility};
    use std::collections::BTreeMap;

    struct NoopStrategy;

    #[async_trait]
    impl SearchStrategy for NoopStrategy {
        fn name(&self) -> &'static str {
            "noop"
        }

        async fn search(&self, _plan: &SearchPlan) -> Result<Vec<ContentRecord>> {
            Ok(Vec::new())
        }
    }

    fn engine() -> AdvancedSearchEngine {
        AdvancedSearchEngine::new(Arc::new(NoopStrategy))
    }

    fn record(rank: Option<f64>) -> ContentRecord {
        let now = Utc::now();
        ContentRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "t".to_string(),
            description: None,
            content_type: ContentType::Blog,
            visibility: Visibility::Public,
            publish_date: None,
            capture_date: now,
            metrics: BTreeMap::new(),
            tags: Vec::new(),
            is_claimed: true,
            original_author: None,
            url: None,
            created_at: now,
            updated_at: now,
            rank,
            author: None,
        }
    }

    #[test]
    fn test_plan_translates_and_scopes() {
        let owner = Uuid::new_v4();
        let request = AdvancedSearchRequest::new("aws community", Caller::authenticated(owner));
        let plan = engine().plan(&request).unwrap();

        assert_eq!(plan.raw_query, "aws community");
        assert_eq!(plan.ts_query, "aws&community");
        assert_eq!(plan.caller_id, Some(owner));
        assert!(plan.scope.contains(Visibility::AwsCommunity));
        assert_eq!(plan.limit, ADVANCED_SEARCH_LIMIT);
    }

    #[test]
    fn test_plan_rejects_blank_query() {
        let err = engine()
            .plan(&AdvancedSearchRequest::new("  \t", Caller::anonymous()))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_rank_desc_puts_missing_rank_last() {
        let mut ranks = vec![None, Some(0.5), Some(2.0), None, Some(1.0)];
        ranks.sort_by(|a, b| rank_desc(*a, *b));
        assert_eq!(ranks, vec![Some(2.0), Some(1.0), Some(0.5), None, None]);
    }

    #[test]
    fn test_finalize_is_stable_for_equal_ranks() {
        let plan = engine()
            .plan(&AdvancedSearchRequest::new("x", Caller::anonymous()))
            .unwrap();
        let rows: Vec<ContentRecord> = (0..5).map(|_| record(Some(1.0))).collect();
        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();

        let out = finalize(&plan, rows);
        assert_eq!(out.iter().map(|r| r.id).collect::<Vec<_>>(), ids);
    }

    #[test]
    fn test_finalize_drops_out_of_scope_rows() {
        let plan = engine()
            .plan(&AdvancedSearchRequest::new("x", Caller::anonymous()))
            .unwrap();
        let mut hidden = record(Some(9.0));
        hidden.visibility = Visibility::AwsOnly;
        let visible = record(Some(1.0));

        let out = finalize(&plan, vec![hidden, visible.clone()]);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, visible.id);
    }
}
