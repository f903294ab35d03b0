//! Input validation for form submissions and remote configuration

use crate::records::Record;
use thiserror::Error;

/// Maximum size for free-text fields (notes, product lists)
pub const MAX_TEXT_FIELD_BYTES: usize = 10_000;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{0} cannot be empty")]
    RequiredField(&'static str),
    #[error("{field} exceeds size limit: {size} bytes (max: {max} bytes)")]
    FieldTooLarge {
        field: &'static str,
        size: usize,
        max: usize,
    },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Validate that a required field is non-empty after trimming.
pub fn validate_non_empty(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::RequiredField(field));
    }
    Ok(())
}

/// Validate that a free-text field fits the size limit.
pub fn validate_text_size(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.len() > MAX_TEXT_FIELD_BYTES {
        return Err(ValidationError::FieldTooLarge {
            field,
            size: value.len(),
            max: MAX_TEXT_FIELD_BYTES,
        });
    }
    Ok(())
}

/// Gate for the save flow: full name and phone are the only required
/// fields; everything else on the form is optional.
pub fn validate_submission(form: &Record) -> Result<(), ValidationError> {
    validate_non_empty(&form.full_name, "Full name")?;
    validate_non_empty(&form.phone, "Phone")?;
    validate_text_size(&form.products_using, "Products in use")?;
    validate_text_size(&form.face_notes, "Face notes")?;
    Ok(())
}

/// Validate a remote base URL (scheme and host present).
pub fn validate_url(raw: &str) -> Result<(), ValidationError> {
    let parsed =
        url::Url::parse(raw).map_err(|e| ValidationError::InvalidUrl(e.to_string()))?;
    if parsed.host_str().is_none() {
        return Err(ValidationError::InvalidUrl("URL has no host".to_string()));
    }
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ValidationError::InvalidUrl(format!(
            "Unsupported scheme: {}",
            parsed.scheme()
        )));
    }
    Ok(())
}

/// Check if a URL uses plain HTTP.
pub fn is_http_url(raw: &str) -> bool {
    url::Url::parse(raw)
        .map(|u| u.scheme() == "http")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_fields() {
        let mut form = Record {
            phone: "0900000000".to_string(),
            ..Record::default()
        };
        assert!(validate_submission(&form).is_err());

        form.full_name = "Anh Le".to_string();
        assert!(validate_submission(&form).is_ok());
    }

    #[test]
    fn test_whitespace_only_name_rejected() {
        let form = Record {
            full_name: "   ".to_string(),
            phone: "0900000000".to_string(),
            ..Record::default()
        };
        assert!(validate_submission(&form).is_err());
    }

    #[test]
    fn test_oversized_notes_rejected() {
        let form = Record {
            full_name: "Anh Le".to_string(),
            phone: "0900000000".to_string(),
            face_notes: "x".repeat(MAX_TEXT_FIELD_BYTES + 1),
            ..Record::default()
        };
        assert!(matches!(
            validate_submission(&form),
            Err(ValidationError::FieldTooLarge { .. })
        ));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.supabase.co").is_ok());
        assert!(validate_url("not a url").is_err());
        assert!(validate_url("ftp://example.com").is_err());
    }

    #[test]
    fn test_is_http_url() {
        assert!(is_http_url("http://localhost:54321"));
        assert!(!is_http_url("https://example.supabase.co"));
    }
}
