//! # notekeep-db
//!
//! Storage backends for notekeep.
//!
//! This crate provides:
//! - Connection pool management
//! - [`PgNoteStore`], the PostgreSQL implementation of [`NoteStore`]
//! - [`MemoryNoteStore`], an in-process implementation with identical semantics
//! - Embedded schema migrations
//!
//! ## Example
//!
//! ```rust,ignore
//! use notekeep_db::{validate_draft, Database, NoteDraft, NoteStore, PoolConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("postgres://localhost/notekeep", &PoolConfig::new()).await?;
//!     db.migrate().await?;
//!
//!     let note = validate_draft(NoteDraft {
//!         title: Some("Hello".to_string()),
//!         content: Some("World".to_string()),
//!         ..Default::default()
//!     })?;
//!     let saved = db.notes.insert(owner_id, note).await?;
//!     println!("Created note: {}", saved.id);
//!     Ok(())
//! }
//! ```
pub mod memory;
pub mod notes;
pub mod pool;

// Test fixtures for integration tests
// Note: Always compiled so integration tests (in tests/) can use DEFAULT_TEST_DATABASE_URL
pub mod test_fixtures;

// Re-export core types
pub use notekeep_core::*;

/// Escape LIKE/ILIKE wildcard characters (`%`, `_`, `\`) in user input.
pub fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

// Re-export store implementations
pub use memory::MemoryNoteStore;
pub use notes::PgNoteStore;
pub use pool::{connect_pool, pool_stats, PoolConfig, PoolStats};

/// Combined database context: the pool and the stores built on it.
#[derive(Clone)]
pub struct Database {
    /// The underlying connection pool.
    pub pool: sqlx::Pool<sqlx::Postgres>,
    /// Note store for CRUD and aggregate queries.
    pub notes: PgNoteStore,
}

impl Database {
    /// Create a new Database instance from a connection pool.
    pub fn new(pool: sqlx::Pool<sqlx::Postgres>) -> Self {
        Self {
            notes: PgNoteStore::new(pool.clone()),
            pool,
        }
    }

    /// Open a pool with `config` and build the stores on it.
    pub async fn connect(url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = connect_pool(url, config).await?;
        Ok(Self::new(pool))
    }

    /// Run pending migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| Error::Database(sqlx::Error::Migrate(Box::new(e))))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    pub fn pool(&self) -> &sqlx::Pool<sqlx::Postgres> {
        &self.pool
    }
}
