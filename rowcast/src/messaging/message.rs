use std::fmt;

use serde::Serialize;
use serde_json::Value as JsonValue;

use super::{MessageCode, Scope, ScopeData, Severity};

/// One diagnostic.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Message {
    pub code: MessageCode,
    pub code_data: Option<JsonValue>,
    pub scope: Scope,
    #[serde(skip_serializing_if = "ScopeData::is_empty")]
    pub scope_data: ScopeData,
    pub severity: Severity,
}

impl Message {
    pub fn new(code: impl Into<MessageCode>, severity: Severity) -> Self {
        Self {
            code: code.into(),
            code_data: None,
            scope: Scope::Sheet,
            scope_data: ScopeData::default(),
            severity,
        }
    }

    pub fn with_data(mut self, data: JsonValue) -> Self {
        self.code_data = Some(data);
        self
    }

    pub fn with_scope(mut self, scope: Scope, scope_data: ScopeData) -> Self {
        self.scope = scope;
        self.scope_data = scope_data;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    fn location(&self) -> String {
        let row = self.scope_data.row.map(|r| r.to_string()).unwrap_or_default();
        let col = self.scope_data.col.as_deref().unwrap_or_default();

        match self.scope {
            Scope::Sheet => "[SHEET]".to_string(),
            Scope::Row => format!("[ROW: {}]", row),
            Scope::Col => format!("[COL: {}]", col),
            Scope::Cell => format!("[CELL: {}{}]", col, row),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.location(), self.severity, self.code)?;

        match &self.code_data {
            None | Some(JsonValue::Null) => Ok(()),
            Some(JsonValue::String(s)) => write!(f, " {}", s),
            Some(data) => write!(f, " {}", data),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn cell(row: usize, col: &str) -> ScopeData {
        ScopeData {
            row: Some(row),
            col: Some(col.into()),
        }
    }

    #[test]
    fn test_display_cell() {
        let message = Message::new(MessageCode::MustBeEmail, Severity::Error)
            .with_data(json!({ "value": "\"foo\"" }))
            .with_scope(Scope::Cell, cell(3, "B"));

        assert_eq!(
            message.to_string(),
            r#"[CELL: B3] ERROR: must_be_email {"value":"\"foo\""}"#
        );
    }

    #[test]
    fn test_display_scopes() {
        let sheet = Message::new("missing_column", Severity::Error).with_data(json!("Foo"));
        assert_eq!(sheet.to_string(), "[SHEET] ERROR: missing_column Foo");

        let row = Message::new("custom", Severity::Warn).with_scope(
            Scope::Row,
            ScopeData {
                row: Some(7),
                col: None,
            },
        );
        assert_eq!(row.to_string(), "[ROW: 7] WARN: custom");

        let col = Message::new(MessageCode::DuplicatedHeader, Severity::Error)
            .with_data(json!("foo"))
            .with_scope(
                Scope::Col,
                ScopeData {
                    row: None,
                    col: Some("AA".into()),
                },
            );
        assert_eq!(col.to_string(), "[COL: AA] ERROR: duplicated_header foo");
    }

    #[test]
    fn test_serialize() {
        let message = Message::new(MessageCode::MustExist, Severity::Error)
            .with_scope(Scope::Cell, cell(2, "A"));

        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({
                "code": "must_exist",
                "code_data": null,
                "scope": "CELL",
                "scope_data": { "row": 2, "col": "A" },
                "severity": "ERROR"
            })
        );
    }
}
