//! Input validation for untrusted request fields.
//!
//! Chart bodies are validated by the normalizer; this module covers what the
//! HTTP layer accepts on its own: output filenames and document size.

use serde_json::Value;
use thiserror::Error;

/// Maximum length for caller-supplied filenames, extension included.
pub const MAX_FILENAME_LEN: usize = 128;
/// Maximum elements per document.
pub const MAX_DOCUMENT_ELEMENTS: usize = 500;

/// Request rejected by the HTTP layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    /// A required top-level field is absent.
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    /// A top-level field has the wrong JSON type.
    #[error("field {0} must be an array")]
    NotAnArray(&'static str),
    /// Filename exceeds maximum length.
    #[error("filename too long (max {MAX_FILENAME_LEN} chars)")]
    FilenameTooLong,
    /// Filename is empty, hidden, or contains characters outside `[A-Za-z0-9._-]`.
    #[error("filename contains invalid characters")]
    FilenameInvalidChars,
    /// Too many elements in one document.
    #[error("too many elements (max {MAX_DOCUMENT_ELEMENTS})")]
    TooManyElements,
}

fn is_valid_filename_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.'
}

/// Validate a caller-supplied PDF filename and append `.pdf` when missing.
///
/// Valid filenames:
/// - 1-128 characters after the extension is added
/// - ASCII alphanumeric, dot, hyphen, underscore only
/// - no leading dot (no hidden files, no `..`)
///
/// # Errors
///
/// Returns [`RequestError::FilenameTooLong`] or
/// [`RequestError::FilenameInvalidChars`].
pub fn validate_pdf_filename(name: &str) -> Result<String, RequestError> {
    let name = name.trim();
    if name.is_empty() || name.starts_with('.') || !name.chars().all(is_valid_filename_char) {
        return Err(RequestError::FilenameInvalidChars);
    }
    let name = if name.to_ascii_lowercase().ends_with(".pdf") {
        name.to_string()
    } else {
        format!("{name}.pdf")
    };
    if name.len() > MAX_FILENAME_LEN {
        return Err(RequestError::FilenameTooLong);
    }
    Ok(name)
}

/// Fetch a required array field.
///
/// # Errors
///
/// Returns [`RequestError::MissingField`] when absent or null,
/// [`RequestError::NotAnArray`] for other types.
pub fn required_array<'a>(body: &'a Value, field: &'static str) -> Result<&'a [Value], RequestError> {
    match body.get(field) {
        None | Some(Value::Null) => Err(RequestError::MissingField(field)),
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(RequestError::NotAnArray(field)),
    }
}

/// Check the total element count of a document.
///
/// # Errors
///
/// Returns [`RequestError::TooManyElements`] above the limit.
pub fn validate_element_count(count: usize) -> Result<(), RequestError> {
    if count > MAX_DOCUMENT_ELEMENTS {
        return Err(RequestError::TooManyElements);
    }
    Ok(())
}
