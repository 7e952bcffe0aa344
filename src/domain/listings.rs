//! Field rules shared by listing creation and updates.

use super::error::DomainError;

pub const DEFAULT_CURRENCY: &str = "USD";
pub const MAX_TITLE_CHARS: usize = 120;
pub const MAX_DESCRIPTION_CHARS: usize = 5_000;

pub fn ensure_non_empty(value: &str, field: &'static str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("`{field}` is required")));
    }
    Ok(())
}

pub fn ensure_max_chars(value: &str, field: &'static str, max: usize) -> Result<(), DomainError> {
    if value.chars().count() > max {
        return Err(DomainError::validation(format!(
            "`{field}` must be at most {max} characters"
        )));
    }
    Ok(())
}

/// Normalise a currency code to upper case; codes are three ASCII letters.
pub fn normalize_currency(code: Option<&str>) -> Result<String, DomainError> {
    let code = match code.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_CURRENCY.to_string()),
        Some(code) => code,
    };

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DomainError::validation(format!(
            "currency `{code}` must be a three-letter code"
        )));
    }

    Ok(code.to_ascii_uppercase())
}

/// Empty image references are stored as absent.
pub fn normalize_image_url(url: Option<String>) -> Option<String> {
    url.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}
