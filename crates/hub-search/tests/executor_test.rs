//! Engine behaviour against an in-memory strategy.
//!
//! The strategy here applies the plan's predicates itself (like the Postgres
//! strategies do in SQL) unless told to misbehave, and records every plan it
//! receives.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use hub_core::{
    Caller, ContentRecord, ContentType, Error, Result, SearchPlan, SearchStrategy, Visibility,
    ADVANCED_SEARCH_LIMIT,
};
use hub_search::{AdvancedSearchEngine, AdvancedSearchRequest};

#[derive(Default)]
struct InMemoryStrategy {
    rows: Vec<ContentRecord>,
    /// Return every row without applying the plan's predicates.
    ignore_predicates: bool,
    fail: bool,
    calls: AtomicUsize,
    plans: Mutex<Vec<SearchPlan>>,
}

impl InMemoryStrategy {
    fn with_rows(rows: Vec<ContentRecord>) -> Self {
        Self {
            rows,
            ..Default::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn last_plan(&self) -> SearchPlan {
        self.plans.lock().unwrap().last().cloned().expect("no plan recorded")
    }
}

#[async_trait]
impl SearchStrategy for InMemoryStrategy {
    fn name(&self) -> &'static str {
        "in_memory"
    }

    async fn search(&self, plan: &SearchPlan) -> Result<Vec<ContentRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.plans.lock().unwrap().push(plan.clone());
        if self.fail {
            return Err(Error::Database(sqlx::Error::PoolTimedOut));
        }
        Ok(self
            .rows
            .iter()
            .filter(|r| self.ignore_predicates || plan.admits(r))
            .cloned()
            .collect())
    }
}

fn record(owner: Uuid, visibility: Visibility, rank: f64) -> ContentRecord {
    let now = Utc::now();
    ContentRecord {
        id: Uuid::new_v4(),
        user_id: owner,
        title: format!("item ranked {}", rank),
        description: None,
        content_type: ContentType::Blog,
        visibility,
        publish_date: None,
        capture_date: now,
        metrics: BTreeMap::new(),
        tags: Vec::new(),
        is_claimed: true,
        original_author: None,
        url: None,
        created_at: now,
        updated_at: now,
        rank: Some(rank),
        author: None,
    }
}

fn engine(strategy: &Arc<InMemoryStrategy>) -> AdvancedSearchEngine {
    AdvancedSearchEngine::new(strategy.clone())
}

#[tokio::test]
async fn test_results_capped_at_limit_in_rank_order() {
    let owner = Uuid::new_v4();
    let rows: Vec<ContentRecord> = (0..150)
        .map(|i| record(owner, Visibility::Public, i as f64))
        .collect();
    let strategy = Arc::new(InMemoryStrategy::with_rows(rows));

    let set = engine(&strategy)
        .execute(&AdvancedSearchRequest::new("item", Caller::anonymous()))
        .await
        .unwrap();

    assert_eq!(set.count(), ADVANCED_SEARCH_LIMIT as usize);
    assert_eq!(set.results[0].rank, Some(149.0));
    assert_eq!(set.results[99].rank, Some(50.0));
    let ranks: Vec<f64> = set.results.iter().map(|r| r.rank.unwrap()).collect();
    assert!(ranks.windows(2).all(|w| w[0] >= w[1]));
    assert_eq!(strategy.last_plan().limit, ADVANCED_SEARCH_LIMIT);
}

#[tokio::test]
async fn test_within_ids_restricts_results() {
    let owner = Uuid::new_v4();
    let rows: Vec<ContentRecord> = (0..5)
        .map(|i| record(owner, Visibility::Public, i as f64))
        .collect();
    let within = vec![rows[1].id, rows[3].id];
    let strategy = Arc::new(InMemoryStrategy::with_rows(rows));

    let set = engine(&strategy)
        .execute(&AdvancedSearchRequest::new("item", Caller::anonymous()).within_ids(within.clone()))
        .await
        .unwrap();

    assert_eq!(set.count(), 2);
    assert!(set.results.iter().all(|r| within.contains(&r.id)));
    assert_eq!(strategy.last_plan().id_restriction(), Some(within.as_slice()));
}

#[tokio::test]
async fn test_empty_within_ids_is_no_restriction() {
    let owner = Uuid::new_v4();
    let rows = vec![
        record(owner, Visibility::Public, 1.0),
        record(owner, Visibility::Public, 2.0),
    ];
    let strategy = Arc::new(InMemoryStrategy::with_rows(rows));

    let set = engine(&strategy)
        .execute(&AdvancedSearchRequest::new("item", Caller::anonymous()).within_ids(Vec::new()))
        .await
        .unwrap();

    assert_eq!(set.count(), 2);
    assert!(strategy.last_plan().id_restriction().is_none());
}

#[tokio::test]
async fn test_owner_sees_private_content() {
    let owner = Uuid::new_v4();
    let stranger = Uuid::new_v4();
    let private = record(owner, Visibility::Private, 1.0);
    let aws_only = record(owner, Visibility::AwsOnly, 2.0);
    let strategy = Arc::new(InMemoryStrategy::with_rows(vec![
        private.clone(),
        aws_only.clone(),
    ]));
    let engine = engine(&strategy);

    let own = engine
        .execute(&AdvancedSearchRequest::new("item", Caller::authenticated(owner)))
        .await
        .unwrap();
    assert_eq!(own.count(), 2);

    let other = engine
        .execute(&AdvancedSearchRequest::new("item", Caller::authenticated(stranger)))
        .await
        .unwrap();
    assert!(other.is_empty());

    let employee = engine
        .execute(&AdvancedSearchRequest::new("item", Caller::privileged(stranger)))
        .await
        .unwrap();
    assert_eq!(employee.count(), 1);
    assert_eq!(employee.results[0].id, aws_only.id);
}

#[tokio::test]
async fn test_rows_outside_scope_are_dropped() {
    let owner = Uuid::new_v4();
    let strategy = Arc::new(InMemoryStrategy {
        rows: vec![
            record(owner, Visibility::Private, 5.0),
            record(owner, Visibility::AwsOnly, 4.0),
            record(owner, Visibility::AwsCommunity, 3.0),
            record(owner, Visibility::Public, 2.0),
        ],
        ignore_predicates: true,
        ..Default::default()
    });

    let set = engine(&strategy)
        .execute(&AdvancedSearchRequest::new("item", Caller::anonymous()))
        .await
        .unwrap();

    assert_eq!(set.count(), 1);
    assert_eq!(set.results[0].visibility, Visibility::Public);
}

#[tokio::test]
async fn test_plan_carries_translation_and_caller() {
    let caller_id = Uuid::new_v4();
    let strategy = Arc::new(InMemoryStrategy::default());

    let set = engine(&strategy)
        .execute(&AdvancedSearchRequest::new(
            "\"aws lambda\" OR serverless",
            Caller::privileged(caller_id),
        ))
        .await
        .unwrap();

    assert!(set.is_empty());
    let plan = strategy.last_plan();
    assert_eq!(plan.raw_query, "\"aws lambda\" OR serverless");
    assert_eq!(plan.ts_query, "aws<->lambda|serverless");
    assert_eq!(plan.caller_id, Some(caller_id));
    assert!(plan.scope.contains(Visibility::AwsOnly));
}

#[tokio::test]
async fn test_blank_query_never_reaches_strategy() {
    let strategy = Arc::new(InMemoryStrategy::default());

    let err = engine(&strategy)
        .execute(&AdvancedSearchRequest::new("   ", Caller::anonymous()))
        .await
        .unwrap_err();

    assert!(err.is_validation());
    assert_eq!(strategy.calls(), 0);
}

#[tokio::test]
async fn test_strategy_error_propagates() {
    let strategy = Arc::new(InMemoryStrategy {
        fail: true,
        ..Default::default()
    });

    let err = engine(&strategy)
        .execute(&AdvancedSearchRequest::new("lambda", Caller::anonymous()))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Database(_)));
    assert_eq!(strategy.calls(), 1);
}
