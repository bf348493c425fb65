//! Input checks shared by the services and the path-parameter parsing in handlers

use super::error::{DomainError, DomainResult};

/// A positive `i32` key (course id, module number, content id, ...)
pub fn positive_key(field: &'static str, value: i64) -> DomainResult<i32> {
    if value < 1 {
        return Err(DomainError::validation(field, format!("{} must be a positive integer", field)));
    }
    i32::try_from(value)
        .map_err(|_| DomainError::validation(field, format!("{} is out of range", field)))
}

/// Parse a path segment as a positive key
pub fn parse_key(field: &'static str, raw: &str) -> DomainResult<i32> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|_| DomainError::validation(field, format!("{} must be a positive integer", field)))?;
    positive_key(field, value)
}

/// Trimmed, non-blank text
pub fn required_text(field: &'static str, value: &str) -> DomainResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation(field, format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

/// Two distinct positive keys for a swap
pub fn swap_pair(first_field: &'static str, first: i64, second_field: &'static str, second: i64) -> DomainResult<(i32, i32)> {
    let first = positive_key(first_field, first)?;
    let second = positive_key(second_field, second)?;
    if first == second {
        return Err(DomainError::invalid(format!(
            "{} and {} must refer to different items",
            first_field, second_field
        )));
    }
    Ok((first, second))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_must_be_positive_and_fit() {
        assert_eq!(positive_key("num1", 3).unwrap(), 3);
        assert!(positive_key("num1", 0).is_err());
        assert!(positive_key("num1", -4).is_err());
        assert!(positive_key("num1", i64::from(i32::MAX) + 1).is_err());
    }

    #[test]
    fn path_segments_parse() {
        assert_eq!(parse_key("course id", "12").unwrap(), 12);
        assert!(parse_key("course id", "abc").is_err());
        assert!(parse_key("course id", "0").is_err());
        assert!(parse_key("course id", "1.5").is_err());
    }

    #[test]
    fn swapping_an_item_with_itself_is_rejected() {
        let err = swap_pair("num1", 2, "num2", 2).unwrap_err();
        assert!(matches!(err, DomainError::Validation { field: None, .. }));
        assert_eq!(swap_pair("num1", 2, "num2", 1).unwrap(), (2, 1));
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(required_text("name", "   ").is_err());
        assert_eq!(required_text("name", "  Intro ").unwrap(), "Intro");
    }
}
