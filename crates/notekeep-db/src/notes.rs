//! PostgreSQL note store.

use std::time::Instant;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{Pool, Postgres, Row};
use tracing::{debug, info};

use notekeep_core::logging::{
    COMPONENT, DURATION_MS, NOTE_ID, OPERATION, OWNER_ID, RESULT_COUNT, SUBSYSTEM,
};
use notekeep_core::{
    Error, NewNote, Note, NoteFilter, NoteId, NotePatch, NoteStats, NoteStore, OwnerId, Result,
};

use crate::escape_like;

const NOTE_COLUMNS: &str =
    "id, owner_id, title, content, category, is_important, created_at, updated_at";

/// PostgreSQL implementation of NoteStore.
#[derive(Clone)]
pub struct PgNoteStore {
    pool: Pool<Postgres>,
}

impl PgNoteStore {
    /// Create a new PgNoteStore with the given connection pool.
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

// =============================================================================
// HELPER FUNCTIONS FOR LIST QUERY BUILDING
// =============================================================================

/// Build the filter clause for the supplied predicates.
///
/// Placeholders are numbered from `param_idx`, which is advanced past the
/// last one used. `$1` is always the owner.
fn build_filter_clause(filter: &NoteFilter, param_idx: &mut usize) -> String {
    let mut clause = String::new();
    if filter.category.is_some() {
        clause.push_str(&format!("AND category = ${} ", param_idx));
        *param_idx += 1;
    }
    if filter.is_important.is_some() {
        clause.push_str(&format!("AND is_important = ${} ", param_idx));
        *param_idx += 1;
    }
    if filter.search.is_some() {
        clause.push_str(&format!(
            "AND (title ILIKE ${0} ESCAPE '\\' OR content ILIKE ${0} ESCAPE '\\') ",
            param_idx
        ));
        *param_idx += 1;
    }
    clause
}

/// Bind NoteFilter parameters in the order `build_filter_clause` numbered them.
macro_rules! bind_filter_params {
    ($query:expr, $filter:expr) => {{
        let mut q = $query;
        if let Some(category) = &$filter.category {
            q = q.bind(category.as_str());
        }
        if let Some(important) = $filter.is_important {
            q = q.bind(important);
        }
        if let Some(term) = &$filter.search {
            q = q.bind(format!("%{}%", escape_like(term)));
        }
        q
    }};
}

/// Map a database row to a Note.
fn map_row_to_note(row: &PgRow) -> Result<Note> {
    Ok(Note {
        id: NoteId::from(row.try_get::<uuid::Uuid, _>("id")?),
        owner: OwnerId::from(row.try_get::<uuid::Uuid, _>("owner_id")?),
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        category: row.try_get("category")?,
        is_important: row.try_get("is_important")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn to_sql_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// `COUNT(*)` never goes negative; a negative value means a broken row.
fn to_count(column: &str, n: i64) -> Result<u64> {
    u64::try_from(n).map_err(|_| Error::Internal(format!("negative {} count: {}", column, n)))
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn find(
        &self,
        owner: OwnerId,
        filter: &NoteFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Note>> {
        let start = Instant::now();
        let mut param_idx = 2;
        let filter_clause = build_filter_clause(filter, &mut param_idx);
        let sql = format!(
            "SELECT {} FROM note WHERE owner_id = $1 {}\
             ORDER BY created_at DESC, id DESC LIMIT ${} OFFSET ${}",
            NOTE_COLUMNS,
            filter_clause,
            param_idx,
            param_idx + 1
        );

        let query = bind_filter_params!(sqlx::query(&sql).bind(owner.as_uuid()), filter)
            .bind(to_sql_i64(limit))
            .bind(to_sql_i64(offset));
        let rows = query.fetch_all(&self.pool).await.map_err(Error::Database)?;
        let notes = rows.iter().map(map_row_to_note).collect::<Result<Vec<_>>>()?;

        debug!(
            { SUBSYSTEM } = "database",
            { COMPONENT } = "pg_store",
            { OPERATION } = "find",
            { OWNER_ID } = %owner,
            { RESULT_COUNT } = notes.len(),
            { DURATION_MS } = start.elapsed().as_millis() as u64,
            "Listed notes"
        );
        Ok(notes)
    }

    async fn count(&self, owner: OwnerId, filter: &NoteFilter) -> Result<u64> {
        let mut param_idx = 2;
        let filter_clause = build_filter_clause(filter, &mut param_idx);
        let sql = format!(
            "SELECT COUNT(*) FROM note WHERE owner_id = $1 {}",
            filter_clause
        );

        let query = bind_filter_params!(
            sqlx::query_scalar::<_, i64>(&sql).bind(owner.as_uuid()),
            filter
        );
        let total = query.fetch_one(&self.pool).await.map_err(Error::Database)?;
        to_count("total", total)
    }

    async fn find_one(&self, owner: OwnerId, id: &str) -> Result<Note> {
        let id = NoteId::parse(id)?;
        let sql = format!(
            "SELECT {} FROM note WHERE id = $1 AND owner_id = $2",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound)?;
        map_row_to_note(&row)
    }

    async fn insert(&self, owner: OwnerId, note: NewNote) -> Result<Note> {
        let id = NoteId::new();
        let now = Utc::now();
        let sql = format!(
            "INSERT INTO note ({}) VALUES ($1, $2, $3, $4, $5, $6, $7, $7) RETURNING {}",
            NOTE_COLUMNS, NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .bind(&note.title)
            .bind(&note.content)
            .bind(&note.category)
            .bind(note.is_important)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(Error::Database)?;

        info!(
            { SUBSYSTEM } = "database",
            { COMPONENT } = "pg_store",
            { OPERATION } = "insert",
            { NOTE_ID } = %id,
            { OWNER_ID } = %owner,
            "Note inserted"
        );
        map_row_to_note(&row)
    }

    async fn update(&self, owner: OwnerId, id: &str, patch: NotePatch) -> Result<Note> {
        let id = NoteId::parse(id)?;
        // Single statement: the read-modify-write is atomic per row.
        let sql = format!(
            "UPDATE note SET
                title = COALESCE($3, title),
                content = COALESCE($4, content),
                category = COALESCE($5, category),
                is_important = COALESCE($6, is_important),
                updated_at = GREATEST($7, updated_at + INTERVAL '1 microsecond')
             WHERE id = $1 AND owner_id = $2
             RETURNING {}",
            NOTE_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .bind(patch.title)
            .bind(patch.content)
            .bind(patch.category)
            .bind(patch.is_important)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?
            .ok_or(Error::NoteNotFound)?;
        map_row_to_note(&row)
    }

    async fn delete(&self, owner: OwnerId, id: &str) -> Result<bool> {
        let id = NoteId::parse(id)?;
        let result = sqlx::query("DELETE FROM note WHERE id = $1 AND owner_id = $2")
            .bind(id.as_uuid())
            .bind(owner.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(Error::Database)?;
        Ok(result.rows_affected() > 0)
    }

    async fn aggregate(&self, owner: OwnerId) -> Result<NoteStats> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total,
                   COUNT(*) FILTER (WHERE is_important) AS important,
                   COALESCE(ARRAY_AGG(DISTINCT category), ARRAY[]::TEXT[]) AS categories
            FROM note
            WHERE owner_id = $1
            "#,
        )
        .bind(owner.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(Error::Database)?;

        let total: i64 = row.try_get("total")?;
        let important: i64 = row.try_get("important")?;
        let mut categories: Vec<String> = row.try_get("categories")?;
        // Byte order, matching the in-memory store regardless of collation.
        categories.sort();

        Ok(NoteStats {
            total_notes: to_count("total", total)?,
            important_notes: to_count("important", important)?,
            categories,
        })
    }
}
