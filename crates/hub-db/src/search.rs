//! Advanced search execution strategies.
//!
//! Two implementations of [`SearchStrategy`] share the column list, the
//! access predicate and the row mapping:
//!
//! - [`PgFullTextSearch`]: `to_tsquery('english', ...)` over the English
//!   tsvector of `title || ' ' || description`, ranked with `ts_rank`.
//! - [`PgSubstringSearch`]: case-insensitive `ILIKE` on title or description
//!   against the raw query, one rank point per matching field.
//!
//! The tsvector expression matches `idx_content_fts` in the migrations so
//! the GIN index is used.

use std::time::Instant;

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, error};

use hub_core::{
    metrics_from_json, AuthorSummary, ContentRecord, Result, SearchPlan, SearchStrategy,
};

use crate::access_filter::{bind_params, AccessFilterQueryBuilder};
use crate::escape_like;

/// Columns selected by both strategies. Expects `content c` and
/// `LEFT JOIN users u`.
const CONTENT_COLUMNS: &str = r#"
    c.id, c.user_id, c.title, c.description, c.content_type, c.visibility,
    c.publish_date, c.capture_date, c.metrics, c.tags, c.is_claimed,
    c.original_author, c.created_at, c.updated_at,
    (SELECT cu.url FROM content_urls cu
      WHERE cu.content_id = c.id
      ORDER BY cu.created_at, cu.id
      LIMIT 1) AS url,
    u.username, u.email, u.is_aws_employee
"#;

/// Full-text search over the English tsvector.
#[derive(Clone)]
pub struct PgFullTextSearch {
    pool: Pool<Postgres>,
}

impl PgFullTextSearch {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn sql(access_clause: &str, limit_idx: usize) -> String {
        format!(
            r#"
            SELECT {columns},
                   ts_rank(
                       to_tsvector('english', c.title || ' ' || COALESCE(c.description, '')),
                       to_tsquery('english', $1)
                   )::float8 AS rank
            FROM content c
            LEFT JOIN users u ON u.id = c.user_id
            WHERE to_tsvector('english', c.title || ' ' || COALESCE(c.description, ''))
                  @@ to_tsquery('english', $1)
              AND {access}
            ORDER BY rank DESC
            LIMIT ${limit_idx}
            "#,
            columns = CONTENT_COLUMNS,
            access = access_clause,
            limit_idx = limit_idx,
        )
    }
}

#[async_trait]
impl SearchStrategy for PgFullTextSearch {
    fn name(&self) -> &'static str {
        "fulltext"
    }

    async fn search(&self, plan: &SearchPlan) -> Result<Vec<ContentRecord>> {
        let (access, params) = AccessFilterQueryBuilder::new(plan, 1).build();
        let sql = Self::sql(&access, params.len() + 2);

        let q = sqlx::query(&sql).bind(&plan.ts_query);
        let q = bind_params(q, &params).bind(plan.limit);

        run(&self.pool, q, self.name(), plan).await
    }
}

/// Substring fallback: `ILIKE '%query%'` on title or description.
#[derive(Clone)]
pub struct PgSubstringSearch {
    pool: Pool<Postgres>,
}

impl PgSubstringSearch {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    fn sql(access_clause: &str, limit_idx: usize) -> String {
        format!(
            r#"
            SELECT {columns},
                   ((CASE WHEN c.title ILIKE $1 ESCAPE '\' THEN 1 ELSE 0 END) +
                    (CASE WHEN COALESCE(c.description, '') ILIKE $1 ESCAPE '\' THEN 1 ELSE 0 END)
                   )::float8 AS rank
            FROM content c
            LEFT JOIN users u ON u.id = c.user_id
            WHERE (c.title ILIKE $1 ESCAPE '\'
                   OR COALESCE(c.description, '') ILIKE $1 ESCAPE '\')
              AND {access}
            ORDER BY rank DESC, c.created_at DESC
            LIMIT ${limit_idx}
            "#,
            columns = CONTENT_COLUMNS,
            access = access_clause,
            limit_idx = limit_idx,
        )
    }

    /// `%term%` with LIKE wildcards in the term escaped.
    pub fn like_pattern(raw_query: &str) -> String {
        format!("%{}%", escape_like(raw_query.trim()))
    }
}

#[async_trait]
impl SearchStrategy for PgSubstringSearch {
    fn name(&self) -> &'static str {
        "substring"
    }

    async fn search(&self, plan: &SearchPlan) -> Result<Vec<ContentRecord>> {
        let (access, params) = AccessFilterQueryBuilder::new(plan, 1).build();
        let sql = Self::sql(&access, params.len() + 2);

        let q = sqlx::query(&sql).bind(Self::like_pattern(&plan.raw_query));
        let q = bind_params(q, &params).bind(plan.limit);

        run(&self.pool, q, self.name(), plan).await
    }
}

async fn run<'q>(
    pool: &Pool<Postgres>,
    q: sqlx::query::Query<'q, Postgres, sqlx::postgres::PgArguments>,
    mode: &'static str,
    plan: &SearchPlan,
) -> Result<Vec<ContentRecord>> {
    let start = Instant::now();

    let rows = q.fetch_all(pool).await.map_err(|e| {
        error!(
            subsystem = "database",
            component = mode,
            op = "search",
            query = %plan.raw_query,
            ts_query = %plan.ts_query,
            error = %e,
            "Search query failed"
        );
        e
    })?;

    debug!(
        subsystem = "database",
        component = mode,
        op = "search",
        result_count = rows.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Search query complete"
    );

    rows.iter().map(map_content_row).collect()
}

/// Map a row selected with [`CONTENT_COLUMNS`] plus `rank`.
fn map_content_row(row: &PgRow) -> Result<ContentRecord> {
    let content_type: String = row.try_get("content_type")?;
    let visibility: String = row.try_get("visibility")?;
    let metrics: Option<serde_json::Value> = row.try_get("metrics")?;
    let tags: Option<Vec<String>> = row.try_get("tags")?;
    let username: Option<String> = row.try_get("username")?;

    let author = match username {
        Some(username) => Some(AuthorSummary {
            username,
            email: row.try_get("email")?,
            is_aws_employee: row
                .try_get::<Option<bool>, _>("is_aws_employee")?
                .unwrap_or(false),
        }),
        None => None,
    };

    Ok(ContentRecord {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        content_type: content_type.parse()?,
        visibility: visibility.parse()?,
        publish_date: row.try_get("publish_date")?,
        capture_date: row.try_get("capture_date")?,
        metrics: metrics.as_ref().map(metrics_from_json).unwrap_or_default(),
        tags: tags.unwrap_or_default(),
        is_claimed: row.try_get("is_claimed")?,
        original_author: row.try_get("original_author")?,
        url: row.try_get("url")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
        rank: row.try_get("rank")?,
        author,
    })
}
