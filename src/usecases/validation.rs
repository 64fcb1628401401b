//! Field rules shared by the services. Every check returns the first failing
//! rule as a `ValidationError` so handlers can surface it unchanged.

use crate::error::AppError;

pub const BOARD_NAME_MAX: usize = 100;
pub const BOARD_DESCRIPTION_MAX: usize = 500;
pub const BOARD_ICON_MAX: usize = 50;
pub const TASK_TITLE_MAX: usize = 200;
pub const TASK_DESCRIPTION_MAX: usize = 2000;
pub const ASSIGNEE_MAX: usize = 100;
pub const LABEL_NAME_MAX: usize = 50;
pub const SUBTASK_TITLE_MAX: usize = 200;

/// Trims a mandatory text field and enforces its length.
pub fn required_text(
    value: Option<&str>,
    max: usize,
    missing: &str,
    too_long: &str,
) -> Result<String, AppError> {
    let value = value.map(str::trim).unwrap_or_default();
    if value.is_empty() {
        return Err(AppError::ValidationError(missing.to_string()));
    }
    if value.chars().count() > max {
        return Err(AppError::ValidationError(too_long.to_string()));
    }
    Ok(value.to_string())
}

/// Trims an optional text field. Blank values are stored as absent.
pub fn optional_text(
    value: Option<String>,
    max: usize,
    too_long: &str,
) -> Result<Option<String>, AppError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    if value.chars().count() > max {
        return Err(AppError::ValidationError(too_long.to_string()));
    }
    Ok(Some(value.to_string()))
}

/// Same as [`optional_text`] for patch fields where `Some(None)` clears.
pub fn optional_patch_text(
    value: Option<Option<String>>,
    max: usize,
    too_long: &str,
) -> Result<Option<Option<String>>, AppError> {
    match value {
        None => Ok(None),
        Some(inner) => optional_text(inner, max, too_long).map(Some),
    }
}

pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    digits.len() == 6 && digits.chars().all(|c| c.is_ascii_hexdigit())
}

pub fn hex_color(value: &str) -> Result<String, AppError> {
    if is_hex_color(value) {
        Ok(value.to_string())
    } else {
        Err(AppError::ValidationError("Invalid color format".to_string()))
    }
}

pub fn position(value: i32) -> Result<i32, AppError> {
    if value < 0 {
        return Err(AppError::ValidationError(
            "Position must be a non-negative integer".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(err: AppError) -> String {
        match err {
            AppError::ValidationError(message) => message,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn required_text_trims_and_rejects_blank() {
        assert_eq!(
            required_text(Some("  Bug "), 50, "missing", "long").unwrap(),
            "Bug"
        );
        assert_eq!(
            message(required_text(Some("   "), 50, "missing", "long").unwrap_err()),
            "missing"
        );
        assert_eq!(
            message(required_text(None, 50, "missing", "long").unwrap_err()),
            "missing"
        );
    }

    #[test]
    fn required_text_counts_characters_not_bytes() {
        let name = "é".repeat(100);
        assert!(required_text(Some(&name), BOARD_NAME_MAX, "m", "l").is_ok());
        let name = "é".repeat(101);
        assert_eq!(
            message(required_text(Some(&name), BOARD_NAME_MAX, "m", "l").unwrap_err()),
            "l"
        );
    }

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(optional_text(Some(" ".to_string()), 10, "l").unwrap(), None);
        assert_eq!(optional_text(None, 10, "l").unwrap(), None);
        assert!(optional_text(Some("x".repeat(11)), 10, "l").is_err());
    }

    #[test]
    fn patch_text_keeps_explicit_clear() {
        assert_eq!(optional_patch_text(None, 10, "l").unwrap(), None);
        assert_eq!(optional_patch_text(Some(None), 10, "l").unwrap(), Some(None));
        assert_eq!(
            optional_patch_text(Some(Some("a".to_string())), 10, "l").unwrap(),
            Some(Some("a".to_string()))
        );
    }

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#6366f1"));
        assert!(is_hex_color("#ABCDEF"));
        assert!(!is_hex_color("6366f1"));
        assert!(!is_hex_color("#6366f"));
        assert!(!is_hex_color("#6366fg"));
        assert_eq!(message(hex_color("red").unwrap_err()), "Invalid color format");
    }

    #[test]
    fn negative_positions_are_rejected() {
        assert_eq!(position(0).unwrap(), 0);
        assert!(position(-1).is_err());
    }
}
