// Translation errors
// Lenient attributes (top, no-lock, descending) never end up here, they fall back to defaults

use thiserror::Error;

/// Everything that can abort a translation
/// A failed translation never produces partial query text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslateError {
    /// A required attribute is missing somewhere in the document
    #[error("missing required attribute '{field}' on <{element}>")]
    MissingRequiredField { element: String, field: String },

    /// The document is not XML, or does not have the fetch/entity shape
    #[error("malformed fetch document: {0}")]
    MalformedInput(String),
}

impl TranslateError {
    pub(crate) fn missing(element: &str, field: &str) -> Self {
        TranslateError::MissingRequiredField {
            element: element.to_string(),
            field: field.to_string(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        TranslateError::MalformedInput(message.into())
    }
}

pub type Result<T> = std::result::Result<T, TranslateError>;
