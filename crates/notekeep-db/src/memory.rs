//! In-process note store.
//!
//! Holds notes in a map behind a `tokio::sync::RwLock`. Used by tests and for
//! running the server without PostgreSQL; query semantics match
//! [`crate::PgNoteStore`] exactly, with aggregation done as a reduction over
//! the owner's notes.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use tokio::sync::RwLock;

use notekeep_core::{
    Error, NewNote, Note, NoteFilter, NoteId, NotePatch, NoteStats, NoteStore, OwnerId, Result,
};

/// In-memory implementation of NoteStore. Clones share the same notes.
#[derive(Clone, Default)]
pub struct MemoryNoteStore {
    notes: Arc<RwLock<HashMap<NoteId, Note>>>,
}

impl MemoryNoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of notes across all owners.
    pub async fn len(&self) -> usize {
        self.notes.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.notes.read().await.is_empty()
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn find(
        &self,
        owner: OwnerId,
        filter: &NoteFilter,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Note>> {
        let notes = self.notes.read().await;
        let mut matching: Vec<&Note> = notes
            .values()
            .filter(|n| n.owner == owner && filter.matches(n))
            .collect();
        matching.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(matching.into_iter().skip(skip).take(take).cloned().collect())
    }

    async fn count(&self, owner: OwnerId, filter: &NoteFilter) -> Result<u64> {
        let notes = self.notes.read().await;
        let total = notes
            .values()
            .filter(|n| n.owner == owner && filter.matches(n))
            .count();
        Ok(total as u64)
    }

    async fn find_one(&self, owner: OwnerId, id: &str) -> Result<Note> {
        let id = NoteId::parse(id)?;
        self.notes
            .read()
            .await
            .get(&id)
            .filter(|n| n.owner == owner)
            .cloned()
            .ok_or(Error::NoteNotFound)
    }

    async fn insert(&self, owner: OwnerId, note: NewNote) -> Result<Note> {
        let now = Utc::now();
        let note = Note {
            id: NoteId::new(),
            title: note.title,
            content: note.content,
            category: note.category,
            is_important: note.is_important,
            owner,
            created_at: now,
            updated_at: now,
        };
        self.notes.write().await.insert(note.id, note.clone());
        Ok(note)
    }

    async fn update(&self, owner: OwnerId, id: &str, patch: NotePatch) -> Result<Note> {
        let id = NoteId::parse(id)?;
        let mut notes = self.notes.write().await;
        let note = notes
            .get_mut(&id)
            .filter(|n| n.owner == owner)
            .ok_or(Error::NoteNotFound)?;

        patch.apply_to(note);
        note.updated_at = Utc::now().max(note.updated_at + Duration::microseconds(1));
        Ok(note.clone())
    }

    async fn delete(&self, owner: OwnerId, id: &str) -> Result<bool> {
        let id = NoteId::parse(id)?;
        let mut notes = self.notes.write().await;
        match notes.get(&id) {
            Some(n) if n.owner == owner => {
                notes.remove(&id);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn aggregate(&self, owner: OwnerId) -> Result<NoteStats> {
        let notes = self.notes.read().await;
        let mut stats = NoteStats::default();
        let mut categories = BTreeSet::new();
        for note in notes.values().filter(|n| n.owner == owner) {
            stats.total_notes += 1;
            if note.is_important {
                stats.important_notes += 1;
            }
            categories.insert(note.category.clone());
        }
        stats.categories = categories.into_iter().collect();
        Ok(stats)
    }
}
