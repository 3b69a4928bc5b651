//! Business logic for the notes resource.
//!
//! `NotesService` sits between the HTTP handlers and a [`NoteStore`]. It
//! applies list defaults, runs write validation before anything reaches the
//! store, and scopes every call to the caller's identity.

use std::sync::Arc;
use std::time::Instant;

use notekeep_core::defaults::{CATEGORY_ALL, PAGE, PAGE_LIMIT};
use notekeep_core::logging::{
    COMPONENT, DURATION_MS, NOTE_ID, OPERATION, OWNER_ID, RESULT_COUNT, SUBSYSTEM,
};
use notekeep_core::{
    validate_draft, validate_patch, Error, ListNotesQuery, Note, NoteDraft, NoteFilter, NoteId,
    NotePage, NoteStats, NoteStore, OwnerId, Pagination, PatchDraft, Result,
};
use tracing::{debug, info};

/// Notes operations over any [`NoteStore`] backend.
#[derive(Clone)]
pub struct NotesService {
    store: Arc<dyn NoteStore>,
}

impl NotesService {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    /// List one page of the owner's notes, newest first.
    pub async fn list(&self, owner: OwnerId, query: ListNotesQuery) -> Result<NotePage> {
        let start = Instant::now();
        let page = positive(query.page, PAGE, "page")?;
        let limit = positive(query.limit, PAGE_LIMIT, "limit")?;
        let filter = build_filter(query.category, query.is_important, query.search);
        let offset = (page - 1).saturating_mul(limit);

        debug!(
            { SUBSYSTEM } = "service",
            { COMPONENT } = "notes",
            { OPERATION } = "list",
            { OWNER_ID } = %owner,
            page,
            limit,
            ?filter,
            "Listing notes"
        );

        let (notes, total) = tokio::try_join!(
            self.store.find(owner, &filter, offset, limit),
            self.store.count(owner, &filter),
        )?;

        debug!(
            { SUBSYSTEM } = "service",
            { COMPONENT } = "notes",
            { OPERATION } = "list",
            { OWNER_ID } = %owner,
            { RESULT_COUNT } = notes.len(),
            total,
            { DURATION_MS } = start.elapsed().as_millis() as u64,
            "Listed notes"
        );

        Ok(NotePage {
            notes,
            pagination: Pagination::new(page, limit, total),
        })
    }

    /// Fetch one of the owner's notes.
    pub async fn get(&self, owner: OwnerId, id: &str) -> Result<Note> {
        self.store.find_one(owner, id).await
    }

    /// Validate and persist a new note owned by `owner`.
    pub async fn create(&self, owner: OwnerId, draft: NoteDraft) -> Result<Note> {
        let new_note = validate_draft(draft)?;
        let note = self.store.insert(owner, new_note).await?;

        info!(
            { SUBSYSTEM } = "service",
            { COMPONENT } = "notes",
            { OPERATION } = "create",
            { OWNER_ID } = %owner,
            { NOTE_ID } = %note.id,
            "Note created"
        );
        Ok(note)
    }

    /// Apply the supplied fields to one of the owner's notes.
    pub async fn update(&self, owner: OwnerId, id: &str, draft: PatchDraft) -> Result<Note> {
        NoteId::parse(id)?;
        let patch = validate_patch(draft)?;
        let note = self.store.update(owner, id, patch).await?;

        debug!(
            { SUBSYSTEM } = "service",
            { COMPONENT } = "notes",
            { OPERATION } = "update",
            { OWNER_ID } = %owner,
            { NOTE_ID } = %note.id,
            "Note updated"
        );
        Ok(note)
    }

    /// Permanently delete one of the owner's notes.
    pub async fn delete(&self, owner: OwnerId, id: &str) -> Result<()> {
        if !self.store.delete(owner, id).await? {
            return Err(Error::NoteNotFound);
        }

        info!(
            { SUBSYSTEM } = "service",
            { COMPONENT } = "notes",
            { OPERATION } = "delete",
            { OWNER_ID } = %owner,
            { NOTE_ID } = id,
            "Note deleted"
        );
        Ok(())
    }

    /// Summary statistics over all of the owner's notes.
    pub async fn stats(&self, owner: OwnerId) -> Result<NoteStats> {
        self.store.aggregate(owner).await
    }
}

/// Resolve an optional 1-based counter, rejecting zero and negatives.
fn positive(value: Option<i64>, default: u64, name: &str) -> Result<u64> {
    match value {
        None => Ok(default),
        Some(v) if v >= 1 => Ok(v as u64),
        Some(_) => Err(Error::validation(format!("{} must be >= 1", name))),
    }
}

/// Build the store filter; `"all"` and blank values mean "no predicate".
fn build_filter(
    category: Option<String>,
    is_important: Option<bool>,
    search: Option<String>,
) -> NoteFilter {
    let category = category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty() && c != CATEGORY_ALL);
    let search = search
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());
    NoteFilter {
        category,
        is_important,
        search,
    }
}
