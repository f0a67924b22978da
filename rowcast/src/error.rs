//! Error types for the rowcast processing pipeline.
//!
//! Only fatal conditions live here: configuration mistakes (unknown type names,
//! duplicated patterns, ...) and backend failures. Problems found in the data
//! itself are never errors; they are [`Message`](crate::messaging::Message)s
//! collected by a [`Messenger`](crate::messaging::Messenger).
//!
//! - [`TypeError`] - Type registry and type usage errors
//! - [`SpecError`] - Template and specification building errors
//! - [`SheetError`] - Backend (document reader) errors
//! - [`MessageError`] - Messages that do not match their code's shape
//! - [`Error`] - Top-level wrapper
//!
//! Error conversion is automatic via `From` implementations,
//! allowing `?` to work across error boundaries.

use std::path::PathBuf;

use thiserror::Error;

use crate::messaging::MessageCode;

// =============================================================================
// Type Errors
// =============================================================================

/// Errors raised by the type engine and the type container.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypeError {
    /// No scalar type registered under this name.
    #[error("Invalid scalar type: {0:?}")]
    UnknownScalar(String),

    /// No composite type registered under this name.
    #[error("Invalid composite type: {0:?}")]
    UnknownComposite(String),

    /// A scalar type was given a slot index.
    #[error("A scalar type cannot be indexed (got index {0})")]
    ScalarIndexed(usize),

    /// A composite type was given a missing or out of range slot index.
    #[error("Invalid index: {index:?} (composite has {slots} slots)")]
    InvalidIndex { index: Option<usize>, slots: usize },

    /// A scalar type was asked to finish a composite value.
    #[error("A scalar type cannot act as a composite")]
    NotComposite,
}

// =============================================================================
// Specification Errors
// =============================================================================

/// Errors raised while compiling a template into a specification.
#[derive(Debug, Error)]
pub enum SpecError {
    /// The same header pattern was registered twice.
    #[error("Duplicated pattern: {0}")]
    DuplicatedPattern(String),

    /// A header pattern could not be compiled.
    #[error("Invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    /// Two template attributes share the same key.
    #[error("Duplicated key: {0:?}")]
    DuplicatedKey(String),

    /// A column references a type that does not exist.
    #[error("Type error: {0}")]
    Type(#[from] TypeError),

    /// Template document could not be parsed.
    #[error("Invalid template document: {0}")]
    Json(#[from] serde_json::Error),

    /// Template document could not be read.
    #[error("Failed to read template: {0}")]
    Io(#[from] std::io::Error),
}

// =============================================================================
// Sheet Errors
// =============================================================================

/// Errors raised by document backends.
///
/// Every variant surfaces to callers as a single `sheet_error` message; the
/// variant itself is only logged.
#[derive(Debug, Error)]
pub enum SheetError {
    /// Failed to read the underlying file.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the document.
    #[error("Invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    /// The document bytes could not be decoded.
    #[error("Failed to decode document as {0}")]
    Encoding(String),

    /// A backend was opened without a table to read from.
    #[error("No table given")]
    MissingTable,
}

impl SheetError {
    /// Message code reported for any backend failure.
    pub fn msg_code(&self) -> MessageCode {
        MessageCode::SheetError
    }
}

// =============================================================================
// Message Errors
// =============================================================================

/// A message that does not match the scope or payload its code declares.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid message {code}: {}", .fields.join(", "))]
pub struct MessageError {
    pub code: String,
    pub fields: Vec<&'static str>,
}

// =============================================================================
// Top-level Errors
// =============================================================================

/// Top-level error returned by [`crate::SheetProcessor`] and the CLI.
///
/// Backend failures never show up here: they are reported as `sheet_error`
/// messages on the sheet result.
#[derive(Debug, Error)]
pub enum Error {
    /// Type engine error.
    #[error("Type error: {0}")]
    Type(#[from] TypeError),

    /// Specification error.
    #[error("Specification error: {0}")]
    Spec(#[from] SpecError),

    /// Output could not be written.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Output could not be serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Result type for type engine operations.
pub type TypeResult<T> = Result<T, TypeError>;

/// Result type for specification building.
pub type SpecResult<T> = Result<T, SpecError>;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, SheetError>;

/// Result type for whole-document processing.
pub type ProcessResult<T> = Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_conversion_chain() {
        let type_err = TypeError::UnknownScalar("foo".into());
        let spec_err: SpecError = type_err.clone().into();
        assert!(spec_err.to_string().contains("\"foo\""));

        let err: Error = type_err.into();
        assert!(err.to_string().contains("Invalid scalar type"));
    }

    #[test]
    fn test_cli_errors_convert_to_error() {
        let spec: Error = SpecError::DuplicatedKey("foo".into()).into();
        assert!(matches!(spec, Error::Spec(SpecError::DuplicatedKey(_))));
        assert_eq!(spec.to_string(), "Specification error: Duplicated key: \"foo\"");

        let io: Error = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed").into();
        assert!(matches!(io, Error::Io(_)));
        assert_eq!(io.to_string(), "IO error: closed");

        let json: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(json, Error::Json(_)));
    }

    #[test]
    fn test_sheet_error_msg_code() {
        let err = SheetError::Encoding("utf-8".into());
        assert_eq!(err.msg_code(), MessageCode::SheetError);
        assert_eq!(err.msg_code().as_str(), "sheet_error");
    }

    #[test]
    fn test_message_error_format() {
        let err = MessageError {
            code: "must_exist".into(),
            fields: vec!["scope", "code_data"],
        };
        assert_eq!(err.to_string(), "Invalid message must_exist: scope, code_data");
    }
}
