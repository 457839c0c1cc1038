//! Persistent storage for the five entity types.
//!
//! Each submodule exposes `create` / `get` / `list` / `update` / `delete`
//! over a `PgPool`, plus the dependent-count queries the deletion guard
//! needs. Structural checks (non-empty required fields, uniqueness) live
//! here; reference checks live in [`crate::integrity`].

pub mod devices;
pub mod readings;
pub mod sensors;
pub mod users;
pub mod zones;

use uuid::Uuid;

use crate::errors::AppError;

/// Parse a path identifier. Anything that is not a UUID is rejected before
/// it reaches the database, distinctly from "not found".
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::Validation("invalid identifier".into()))
}

/// A required text field must be present and non-empty.
fn required_text(field: &'static str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_owned())
}

/// Same check for a partial update: absent is fine, supplied-but-empty is not.
fn required_text_opt(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<String>, AppError> {
    value.map(|v| required_text(field, v)).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_uuids() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
    }

    #[test]
    fn parse_id_rejects_garbage() {
        assert!(matches!(parse_id("12345"), Err(AppError::Validation(_))));
        assert!(matches!(parse_id(""), Err(AppError::Validation(_))));
    }

    #[test]
    fn required_text_rejects_blank() {
        assert!(required_text("name", "  ").is_err());
        assert_eq!(required_text("name", " Zona A ").unwrap(), "Zona A");
        assert_eq!(required_text_opt("name", None).unwrap(), None);
        assert!(required_text_opt("name", Some("")).is_err());
    }
}
