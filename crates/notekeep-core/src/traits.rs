//! Core traits for notekeep abstractions.
//!
//! These traits define the interfaces that concrete backends must satisfy,
//! enabling pluggable persistence and testability.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewNote, Note, NoteFilter, NotePatch, NoteStats, OwnerId};

// =============================================================================
// NOTE STORE
// =============================================================================

/// Persistent storage for notes.
///
/// Every method is scoped to `owner`: a note belonging to someone else is
/// reported exactly like a missing one. Ids arrive as raw strings and a
/// malformed id yields `Error::InvalidIdentifier`, never `Error::NoteNotFound`.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Fetch one page of matching notes, newest first by creation time.
    async fn find(
        &self,
        owner: OwnerId,
        filter: &NoteFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Note>>;

    /// Count notes matching `filter` (same semantics as `find`).
    async fn count(&self, owner: OwnerId, filter: &NoteFilter) -> Result<u64>;

    /// Fetch a single note.
    async fn find_one(&self, owner: OwnerId, id: &str) -> Result<Note>;

    /// Persist a new note, assigning its id and timestamps.
    async fn insert(&self, owner: OwnerId, note: NewNote) -> Result<Note>;

    /// Apply a patch atomically and refresh `updated_at`.
    async fn update(&self, owner: OwnerId, id: &str, patch: NotePatch) -> Result<Note>;

    /// Permanently remove a note. Returns whether a record was removed.
    async fn delete(&self, owner: OwnerId, id: &str) -> Result<bool>;

    /// Total count, important count and distinct categories.
    async fn aggregate(&self, owner: OwnerId) -> Result<NoteStats>;
}
