//! Core data models for notekeep.
//!
//! These types are shared across all notekeep crates and represent the note
//! domain: the stored record, its write inputs, list filters, and the shapes
//! returned to clients.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

// =============================================================================
// IDENTIFIERS
// =============================================================================

/// Identifier of a stored note (UUIDv7, time-ordered).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(crate::uuid_utils::new_v7())
    }

    /// Parse a caller-supplied identifier.
    ///
    /// Anything that is not a UUID yields [`Error::InvalidIdentifier`], which
    /// callers must keep distinct from [`Error::NoteNotFound`].
    pub fn parse(raw: &str) -> Result<Self> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| Error::InvalidIdentifier(raw.to_string()))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for NoteId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier of the authenticated user that owns notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(Uuid);

impl OwnerId {
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for OwnerId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// =============================================================================
// NOTE TYPES
// =============================================================================

/// A user-owned text note as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_important: bool,
    #[serde(rename = "user")]
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A validated note ready for insertion.
///
/// Produced by [`crate::validation::validate_draft`]; stores trust its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: String,
    pub category: String,
    pub is_important: bool,
}

/// A validated partial update. `None` leaves the stored field untouched.
///
/// Produced by [`crate::validation::validate_patch`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub is_important: Option<bool>,
}

impl NotePatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.category.is_none()
            && self.is_important.is_none()
    }

    /// Apply the supplied fields to `note` in place.
    pub fn apply_to(&self, note: &mut Note) {
        if let Some(title) = &self.title {
            note.title = title.clone();
        }
        if let Some(content) = &self.content {
            note.content = content.clone();
        }
        if let Some(category) = &self.category {
            note.category = category.clone();
        }
        if let Some(important) = self.is_important {
            note.is_important = important;
        }
    }
}

/// Unvalidated create payload, as sent by a client.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDraft {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub is_important: Option<bool>,
}

/// Unvalidated update payload, as sent by a client.
///
/// The outer `Option` records presence: a missing key is `None`, an explicit
/// JSON `null` is `Some(None)`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatchDraft {
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub content: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub is_important: Option<Option<bool>>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// =============================================================================
// QUERY TYPES
// =============================================================================

/// Predicates for list and count queries. All supplied predicates must hold.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Importance flag match.
    pub is_important: Option<bool>,
    /// Case-insensitive substring of title OR content.
    pub search: Option<String>,
}

impl NoteFilter {
    /// Evaluate the filter against a single note (owner scoping excluded).
    pub fn matches(&self, note: &Note) -> bool {
        if let Some(category) = &self.category {
            if &note.category != category {
                return false;
            }
        }
        if let Some(important) = self.is_important {
            if note.is_important != important {
                return false;
            }
        }
        if let Some(term) = &self.search {
            let term = term.to_lowercase();
            if !note.title.to_lowercase().contains(&term)
                && !note.content.to_lowercase().contains(&term)
            {
                return false;
            }
        }
        true
    }
}

/// Caller-facing list parameters, before defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct ListNotesQuery {
    pub category: Option<String>,
    pub is_important: Option<bool>,
    pub search: Option<String>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Pagination metadata for a windowed result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Requested page (1-based).
    pub current: u64,
    /// Number of pages, `ceil(total / page_size)`; zero when nothing matched.
    pub pages: u64,
    /// Number of matching notes across all pages.
    pub total: u64,
}

impl Pagination {
    pub fn new(current: u64, page_size: u64, total: u64) -> Self {
        let pages = if page_size == 0 {
            0
        } else {
            total.div_ceil(page_size)
        };
        Self {
            current,
            pages,
            total,
        }
    }
}

/// One page of a note listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotePage {
    pub notes: Vec<Note>,
    pub pagination: Pagination,
}

/// Aggregate statistics over one owner's notes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteStats {
    pub total_notes: u64,
    pub important_notes: u64,
    /// Distinct categories in use, sorted ascending.
    pub categories: Vec<String>,
}
