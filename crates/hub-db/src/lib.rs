//! # hub-db
//!
//! PostgreSQL database layer for content-hub search.
//!
//! This crate provides:
//! - Connection pool management
//! - The SQL form of the search access predicate
//! - Full-text and substring search strategies
//!
//! ## Example
//!
//! ```rust,ignore
//! use hub_db::{Database, PoolConfig};
//!
//! let db = Database::connect("postgres://localhost/content_hub", &PoolConfig::default()).await?;
//! let strategy = db.fulltext.clone();
//! // ... hand the strategy to the search engine ...
//! db.close().await;
//! ```

pub mod access_filter;
pub mod pool;
pub mod search;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

use hub_core::{Error, Result};

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use access_filter::{AccessFilterQueryBuilder, QueryParam};
pub use pool::{create_pool, log_pool_metrics, PoolConfig};
pub use search::{PgFullTextSearch, PgSubstringSearch};

/// Database context: the shared pool plus the search strategies built on it.
///
/// Construct once per process and close it explicitly at shutdown.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Full-text (tsvector) search strategy.
    pub fulltext: PgFullTextSearch,
    /// Substring (ILIKE) search strategy.
    pub substring: PgSubstringSearch,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            fulltext: PgFullTextSearch::new(pool.clone()),
            substring: PgSubstringSearch::new(pool.clone()),
            pool,
        }
    }

    /// Connect with the given pool configuration.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = create_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    #[cfg(feature = "migrations")]
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Round-trip a trivial query to check the database is reachable.
    pub async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        log_pool_metrics(&self.pool);
        Ok(())
    }

    /// Close every pooled connection. Pending acquires fail afterwards.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("back\\slash"), "back\\\\slash");
    }
}
