//! Field validation for note writes.
//!
//! Text fields are trimmed before checking. Every violated constraint is
//! reported, so a single rejection tells the client everything to fix.

use crate::defaults::{CATEGORY_MAX_CHARS, CONTENT_MAX_CHARS, DEFAULT_CATEGORY, TITLE_MAX_CHARS};
use crate::error::{Error, Result};
use crate::models::{NewNote, NoteDraft, NotePatch, PatchDraft};

/// Validate a create payload, applying field defaults.
pub fn validate_draft(draft: NoteDraft) -> Result<NewNote> {
    let mut errors = Vec::new();

    let title = required_text(draft.title, "Title", TITLE_MAX_CHARS, &mut errors);
    let content = required_text(draft.content, "Content", CONTENT_MAX_CHARS, &mut errors);
    let category = category_or_default(draft.category, &mut errors);

    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    Ok(NewNote {
        title,
        content,
        category,
        is_important: draft.is_important.unwrap_or(false),
    })
}

/// Validate an update payload. Only present fields are checked.
pub fn validate_patch(draft: PatchDraft) -> Result<NotePatch> {
    let mut errors = Vec::new();

    let title = draft
        .title
        .map(|v| required_text(v, "Title", TITLE_MAX_CHARS, &mut errors));
    let content = draft
        .content
        .map(|v| required_text(v, "Content", CONTENT_MAX_CHARS, &mut errors));
    let category = draft
        .category
        .map(|v| category_or_default(v, &mut errors));
    let is_important = match draft.is_important {
        Some(Some(flag)) => Some(flag),
        Some(None) => {
            errors.push("isImportant must be true or false".to_string());
            None
        }
        None => None,
    };

    if !errors.is_empty() {
        return Err(Error::Validation(errors));
    }

    Ok(NotePatch {
        title,
        content,
        category,
        is_important,
    })
}

fn required_text(
    value: Option<String>,
    field: &str,
    max_chars: usize,
    errors: &mut Vec<String>,
) -> String {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        errors.push(format!("{} is required", field));
    } else if trimmed.chars().count() > max_chars {
        errors.push(format!(
            "{} cannot exceed {} characters",
            field, max_chars
        ));
    }
    trimmed.to_string()
}

fn category_or_default(value: Option<String>, errors: &mut Vec<String>) -> String {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return DEFAULT_CATEGORY.to_string();
    }
    if trimmed.chars().count() > CATEGORY_MAX_CHARS {
        errors.push(format!(
            "Category cannot exceed {} characters",
            CATEGORY_MAX_CHARS
        ));
    }
    trimmed.to_string()
}
