//! Note model.

use notes_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `notes` table.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new note. The title has already been validated.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub title: String,
    /// Stored as an empty string when `None`.
    pub content: Option<String>,
}

/// DTO for updating a note. Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
}
