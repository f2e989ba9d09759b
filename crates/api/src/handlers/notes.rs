//! Handlers for the notes API.
//!
//! Each endpoint maps onto one `NoteRepo` call. Responses are bare JSON
//! values (a note or an array of notes), errors go through [`AppError`].

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use notes_core::error::CoreError;
use notes_core::notes::{
    validate_optional_content, validate_optional_title, validate_required_title, NOTE_ENTITY,
};
use notes_core::types::DbId;
use notes_db::models::note::{CreateNote, UpdateNote};
use notes_db::repositories::NoteRepo;

use crate::error::{AppError, AppResult};
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of `POST /api/notes`.
///
/// `title` is optional here so a missing title is reported as a validation
/// error rather than a deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: NOTE_ENTITY,
        id,
    })
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/notes
///
/// List every note, most recently updated first.
pub async fn list_notes(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let notes = NoteRepo::list(&state.pool).await?;
    Ok(Json(notes))
}

/// GET /api/notes/{id}
pub async fn get_note(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let note = NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    Ok(Json(note))
}

/// POST /api/notes
///
/// Create a note. `content` defaults to an empty string.
pub async fn create_note(
    State(state): State<AppState>,
    AppJson(input): AppJson<CreateNoteRequest>,
) -> AppResult<impl IntoResponse> {
    let title = validate_required_title(input.title.as_deref()).map_err(CoreError::Validation)?;
    validate_optional_content(input.content.as_deref()).map_err(CoreError::Validation)?;

    let create = CreateNote {
        title: title.to_string(),
        content: input.content,
    };
    let note = NoteRepo::create(&state.pool, &create).await?;

    tracing::info!(note_id = note.id, "Note created");

    Ok((StatusCode::CREATED, Json(note)))
}

/// PUT /api/notes/{id}
///
/// Partial update: omitted fields keep their stored value.
pub async fn update_note(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
    AppJson(input): AppJson<UpdateNote>,
) -> AppResult<impl IntoResponse> {
    let validation = validate_optional_title(input.title.as_deref())
        .and_then(|()| validate_optional_content(input.content.as_deref()));
    if let Err(msg) = validation {
        // A missing row is reported as not found even when the body is invalid.
        if NoteRepo::find_by_id(&state.pool, id).await?.is_none() {
            return Err(not_found(id));
        }
        return Err(CoreError::Validation(msg).into());
    }

    let note = NoteRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(note_id = id, "Note updated");

    Ok(Json(note))
}

/// DELETE /api/notes/{id}
pub async fn delete_note(
    State(state): State<AppState>,
    AppPath(id): AppPath<DbId>,
) -> AppResult<impl IntoResponse> {
    let deleted = NoteRepo::delete(&state.pool, id).await?;

    if !deleted {
        return Err(not_found(id));
    }

    tracing::info!(note_id = id, "Note deleted");

    Ok(StatusCode::NO_CONTENT)
}
