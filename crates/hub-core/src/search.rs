//! Search plan and result types.

use uuid::Uuid;

use crate::access::VisibilityScope;
use crate::models::ContentRecord;

/// Maximum number of rows returned by advanced search.
pub const ADVANCED_SEARCH_LIMIT: i64 = 100;

/// Everything an execution strategy needs to run one search.
#[derive(Debug, Clone)]
pub struct SearchPlan {
    /// Query as the user typed it.
    pub raw_query: String,
    /// Query translated to tsquery syntax.
    pub ts_query: String,
    pub scope: VisibilityScope,
    pub caller_id: Option<Uuid>,
    /// "Search within previous results". `None` and an empty list both
    /// mean no restriction.
    pub restrict_to_ids: Option<Vec<Uuid>>,
    pub limit: i64,
}

impl SearchPlan {
    /// The id restriction, if it actually restricts anything.
    pub fn id_restriction(&self) -> Option<&[Uuid]> {
        self.restrict_to_ids
            .as_deref()
            .filter(|ids| !ids.is_empty())
    }

    /// Whether a row satisfies the access and id predicates of this plan.
    pub fn admits(&self, record: &ContentRecord) -> bool {
        let visible = self
            .scope
            .permits(record.visibility, record.user_id, self.caller_id);
        let in_set = self
            .id_restriction()
            .map(|ids| ids.contains(&record.id))
            .unwrap_or(true);
        visible && in_set
    }
}

/// Ranked, capped result of one search.
#[derive(Debug, Clone, Default)]
pub struct SearchResultSet {
    pub results: Vec<ContentRecord>,
}

impl SearchResultSet {
    /// Number of returned rows (not a total match count).
    pub fn count(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
