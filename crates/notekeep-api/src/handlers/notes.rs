//! `/api/notes` handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use notekeep_core::{ListNotesQuery, Note, NoteDraft, NotePage, NoteStats, PatchDraft};
use serde::{Deserialize, Serialize};

use super::ApiResponse;
use crate::auth::AuthUser;
use crate::error::{ApiError, ResultExt};
use crate::state::AppState;

/// Raw list query string. Values arrive as text so malformed numbers
/// produce the API's own 400 body instead of axum's plain-text rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub category: Option<String>,
    pub important: Option<String>,
    pub search: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl ListParams {
    fn into_query(self) -> Result<ListNotesQuery, ApiError> {
        Ok(ListNotesQuery {
            category: self.category,
            // Clients always send the flag; only "true" narrows the list.
            is_important: match self.important.as_deref().map(str::trim) {
                Some("true") => Some(true),
                _ => None,
            },
            search: self.search,
            page: parse_counter(self.page, "page")?,
            limit: parse_counter(self.limit, "limit")?,
        })
    }
}

fn parse_counter(raw: Option<String>, name: &str) -> Result<Option<i64>, ApiError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .map_err(|_| ApiError::BadRequest(format!("{} must be a positive integer", name))),
    }
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge("Request body is too large".to_string())
        } else {
            ApiError::BadRequest(format!("Invalid request body: {}", rejection.body_text()))
        }
    })
}

#[derive(Debug, Serialize)]
pub struct NoteEnvelope {
    pub note: Note,
}

pub async fn list_notes(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<NotePage>>, ApiError> {
    let query = params.into_query()?;
    let page = state
        .notes
        .list(auth.owner, query)
        .await
        .during("fetching notes")?;
    Ok(Json(ApiResponse::data(page)))
}

pub async fn get_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<NoteEnvelope>>, ApiError> {
    let note = state
        .notes
        .get(auth.owner, &id)
        .await
        .during("fetching note")?;
    Ok(Json(ApiResponse::data(NoteEnvelope { note })))
}

pub async fn create_note(
    State(state): State<AppState>,
    auth: AuthUser,
    body: Result<Json<NoteDraft>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = json_body(body)?;
    let note = state
        .notes
        .create(auth.owner, draft)
        .await
        .during("creating note")?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Note created successfully",
            NoteEnvelope { note },
        )),
    ))
}

pub async fn update_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    body: Result<Json<PatchDraft>, JsonRejection>,
) -> Result<Json<ApiResponse<NoteEnvelope>>, ApiError> {
    let draft = json_body(body)?;
    let note = state
        .notes
        .update(auth.owner, &id, draft)
        .await
        .during("updating note")?;
    Ok(Json(ApiResponse::with_message(
        "Note updated successfully",
        NoteEnvelope { note },
    )))
}

pub async fn delete_note(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .notes
        .delete(auth.owner, &id)
        .await
        .during("deleting note")?;
    Ok(Json(ApiResponse::message("Note deleted successfully")))
}

pub async fn note_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ApiResponse<NoteStats>>, ApiError> {
    let stats = state
        .notes
        .stats(auth.owner)
        .await
        .during("fetching statistics")?;
    Ok(Json(ApiResponse::data(stats)))
}
