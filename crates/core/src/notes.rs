//! Note field constants and validation.
//!
//! Validators return a human-readable message on failure; the API layer
//! wraps it in [`CoreError::Validation`](crate::error::CoreError::Validation).

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a note title in characters (matches `VARCHAR(255)`).
pub const MAX_TITLE_LENGTH: usize = 255;

/// Entity name used in not-found errors.
pub const NOTE_ENTITY: &str = "Note";

// ---------------------------------------------------------------------------
// Validation functions
// ---------------------------------------------------------------------------

/// Validate the title supplied on create: it must be present and non-blank.
pub fn validate_required_title(title: Option<&str>) -> Result<&str, String> {
    match title {
        Some(title) => {
            validate_title(title)?;
            Ok(title)
        }
        None => Err("title is required".to_string()),
    }
}

/// Validate a title value: non-blank and within the length limit.
pub fn validate_title(title: &str) -> Result<(), String> {
    if title.trim().is_empty() {
        return Err("title is required".to_string());
    }
    if title.contains('\0') {
        return Err("title must not contain NUL characters".to_string());
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(format!(
            "title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        ));
    }
    Ok(())
}

/// Validate an optional title on update. `None` means "leave unchanged".
pub fn validate_optional_title(title: Option<&str>) -> Result<(), String> {
    match title {
        Some(title) => validate_title(title),
        None => Ok(()),
    }
}

/// Validate optional content. Postgres `TEXT` cannot store NUL characters.
pub fn validate_optional_content(content: Option<&str>) -> Result<(), String> {
    match content {
        Some(content) if content.contains('\0') => {
            Err("content must not contain NUL characters".to_string())
        }
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- validate_required_title ---------------------------------------------

    #[test]
    fn present_title_accepted() {
        assert_eq!(validate_required_title(Some("Groceries")), Ok("Groceries"));
    }

    #[test]
    fn missing_title_rejected() {
        let result = validate_required_title(None);
        assert_eq!(result, Err("title is required".to_string()));
    }

    #[test]
    fn empty_title_rejected() {
        assert!(validate_required_title(Some("")).is_err());
    }

    #[test]
    fn whitespace_only_title_rejected() {
        assert!(validate_required_title(Some("   \t\n")).is_err());
    }

    // -- validate_title ------------------------------------------------------

    #[test]
    fn title_at_max_length_accepted() {
        let title = "a".repeat(MAX_TITLE_LENGTH);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn title_over_max_length_rejected() {
        let title = "a".repeat(MAX_TITLE_LENGTH + 1);
        let result = validate_title(&title);
        assert!(result.unwrap_err().contains("maximum length"));
    }

    #[test]
    fn title_length_counts_characters_not_bytes() {
        // 255 two-byte characters is 510 bytes but still within the limit.
        let title = "é".repeat(MAX_TITLE_LENGTH);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn title_with_nul_rejected() {
        let result = validate_title("bad\0title");
        assert!(result.unwrap_err().contains("NUL"));
    }

    // -- validate_optional_content -------------------------------------------

    #[test]
    fn omitted_or_plain_content_accepted() {
        assert!(validate_optional_content(None).is_ok());
        assert!(validate_optional_content(Some("")).is_ok());
        assert!(validate_optional_content(Some("line one\nline two")).is_ok());
    }

    #[test]
    fn content_with_nul_rejected() {
        assert!(validate_optional_content(Some("a\0b")).is_err());
    }

    // -- validate_optional_title ---------------------------------------------

    #[test]
    fn omitted_title_on_update_accepted() {
        assert!(validate_optional_title(None).is_ok());
    }

    #[test]
    fn empty_title_on_update_rejected() {
        assert!(validate_optional_title(Some("")).is_err());
    }

    #[test]
    fn new_title_on_update_accepted() {
        assert!(validate_optional_title(Some("Renamed")).is_ok());
    }
}
