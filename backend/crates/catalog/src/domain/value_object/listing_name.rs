//! Listing display name and category
//!
//! Free text, trimmed; control characters are rejected so names can go into
//! `Content-Disposition` headers and logs unescaped.

use crate::error::CatalogError;

pub const LISTING_NAME_MAX_LENGTH: usize = 255;
pub const CATEGORY_MAX_LENGTH: usize = 64;

fn clean(field: &str, raw: &str, max: usize) -> Result<String, CatalogError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(CatalogError::InvalidField(format!("{field} is empty")));
    }
    if value.chars().count() > max {
        return Err(CatalogError::InvalidField(format!(
            "{field} exceeds {max} characters"
        )));
    }
    if value.chars().any(char::is_control) {
        return Err(CatalogError::InvalidField(format!(
            "{field} contains control characters"
        )));
    }
    Ok(value.to_string())
}

pub fn listing_name(raw: &str) -> Result<String, CatalogError> {
    clean("name", raw, LISTING_NAME_MAX_LENGTH)
}

pub fn category(raw: &str) -> Result<String, CatalogError> {
    clean("category", raw, CATEGORY_MAX_LENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_name() {
        assert_eq!(listing_name("  dataset.csv ").unwrap(), "dataset.csv");
        assert!(listing_name("   ").is_err());
        assert!(listing_name("a\nb").is_err());
        assert!(listing_name(&"x".repeat(256)).is_err());
    }

    #[test]
    fn test_category() {
        assert_eq!(category("weather").unwrap(), "weather");
        assert!(category(&"c".repeat(65)).is_err());
    }
}
