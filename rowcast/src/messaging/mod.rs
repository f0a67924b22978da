//! Scoped diagnostics.
//!
//! Problems found in a document are never errors: they are [`Message`]s
//! appended to a [`Messenger`], each one tagged with the location it was
//! found at (whole sheet, row, column or single cell) and a severity.
//!
//! # Scopes
//!
//! | Scope | Data | Display |
//! |-------|------|---------|
//! | `SHEET` | none | `[SHEET]` |
//! | `ROW` | row number | `[ROW: 3]` |
//! | `COL` | column letter | `[COL: B]` |
//! | `CELL` | both | `[CELL: B3]` |
//!
//! A messenger only ever narrows: scoping a row-scoped messenger to a column
//! yields a cell scope, and there is no way back to `SHEET` other than a
//! fresh messenger.

mod codes;
mod config;
mod message;
mod messenger;
pub mod validation;

use serde::Serialize;

pub use codes::MessageCode;
pub use config::MessagingConfig;
pub use message::Message;
pub use messenger::{Messenger, ScopeGuard};

/// Location granularity of a message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Scope {
    #[default]
    Sheet,
    Row,
    Col,
    Cell,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Sheet => "SHEET",
            Scope::Row => "ROW",
            Scope::Col => "COL",
            Scope::Cell => "CELL",
        }
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row number and/or column letter matching a [`Scope`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub struct ScopeData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub col: Option<String>,
}

impl ScopeData {
    pub fn is_empty(&self) -> bool {
        self.row.is_none() && self.col.is_none()
    }
}

/// Message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_serialization() {
        assert_eq!(serde_json::to_value(Scope::Cell).unwrap(), "CELL");
        assert_eq!(serde_json::to_value(Severity::Warn).unwrap(), "WARN");
    }

    #[test]
    fn test_scope_data_skips_absent_axes() {
        let data = ScopeData { row: Some(3), col: None };
        assert_eq!(serde_json::to_value(&data).unwrap(), serde_json::json!({ "row": 3 }));
        assert!(ScopeData::default().is_empty());
    }
}
