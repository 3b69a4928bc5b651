use std::sync::Arc;

use axum::http::HeaderName;
use notekeep_core::defaults::IDENTITY_HEADER;
use notekeep_db::Database;

use crate::middleware::GlobalRateLimiter;
use crate::services::NotesService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub notes: NotesService,
    /// Header carrying the caller's identity, set by the upstream auth layer.
    pub identity_header: HeaderName,
    pub rate_limiter: Option<Arc<GlobalRateLimiter>>,
    /// Present when notes live in PostgreSQL; used by the health check.
    pub db: Option<Database>,
}

impl AppState {
    pub fn new(notes: NotesService) -> Self {
        Self {
            notes,
            identity_header: HeaderName::from_static(IDENTITY_HEADER),
            rate_limiter: None,
            db: None,
        }
    }

    pub fn with_identity_header(mut self, header: HeaderName) -> Self {
        self.identity_header = header;
        self
    }

    pub fn with_rate_limiter(mut self, limiter: Option<Arc<GlobalRateLimiter>>) -> Self {
        self.rate_limiter = limiter;
        self
    }

    pub fn with_database(mut self, db: Database) -> Self {
        self.db = Some(db);
        self
    }
}
