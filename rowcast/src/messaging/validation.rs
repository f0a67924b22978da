//! Shape checks for built-in messages.
//!
//! Each built-in code declares the scope it is emitted at and a JSON Schema
//! (draft 7) for its `code_data` payload. Custom codes are never checked.
//!
//! | Code | Scope | Payload |
//! |------|-------|---------|
//! | `invalid_header`, `ignored_column` | COL | header text or null |
//! | `duplicated_header` | COL | header text |
//! | `missing_column` | SHEET | canonical header text |
//! | `must_exist`, `must_be_string`, `must_be_array`, `cleaned_string` | CELL | null |
//! | `must_be_boolsy`, `must_be_email` | CELL | `{ "value": string }` |
//! | `must_be_date` | CELL | `{ "format": string }` |
//! | `no_applicable_backend`, `sheet_error` | SHEET | null |

use std::collections::HashMap;

use once_cell::sync::Lazy;
use serde_json::{json, Value as JsonValue};

use super::{Message, MessageCode, Scope};
use crate::error::MessageError;

/// Expected scope and payload schema of a built-in code.
#[derive(Debug, Clone)]
pub struct MessageShape {
    pub scope: Scope,
    pub code_data: JsonValue,
}

static SHAPES: Lazy<HashMap<MessageCode, MessageShape>> = Lazy::new(|| {
    let null = json!({ "type": "null" });
    let text = json!({ "type": "string" });
    let text_or_null = json!({ "type": ["string", "null"] });
    let value = json!({
        "type": "object",
        "required": ["value"],
        "properties": { "value": { "type": "string" } }
    });
    let format = json!({
        "type": "object",
        "required": ["format"],
        "properties": { "format": { "type": "string" } }
    });

    let shape = |scope, code_data: &JsonValue| MessageShape {
        scope,
        code_data: code_data.clone(),
    };

    HashMap::from([
        (MessageCode::InvalidHeader, shape(Scope::Col, &text_or_null)),
        (MessageCode::IgnoredColumn, shape(Scope::Col, &text_or_null)),
        (MessageCode::DuplicatedHeader, shape(Scope::Col, &text)),
        (MessageCode::MissingColumn, shape(Scope::Sheet, &text)),
        (MessageCode::MustExist, shape(Scope::Cell, &null)),
        (MessageCode::MustBeString, shape(Scope::Cell, &null)),
        (MessageCode::MustBeArray, shape(Scope::Cell, &null)),
        (MessageCode::CleanedString, shape(Scope::Cell, &null)),
        (MessageCode::MustBeBoolsy, shape(Scope::Cell, &value)),
        (MessageCode::MustBeEmail, shape(Scope::Cell, &value)),
        (MessageCode::MustBeDate, shape(Scope::Cell, &format)),
        (MessageCode::NoApplicableBackend, shape(Scope::Sheet, &null)),
        (MessageCode::SheetError, shape(Scope::Sheet, &null)),
    ])
});

/// Declared shape of a code, `None` for custom codes.
pub fn shape(code: &MessageCode) -> Option<&'static MessageShape> {
    SHAPES.get(code)
}

/// Checks a message against its code's declared shape.
///
/// Returns the list of offending fields (`scope`, `scope_data`, `code_data`).
pub fn validate(message: &Message) -> Result<(), MessageError> {
    let Some(shape) = shape(&message.code) else {
        return Ok(());
    };

    let mut fields = Vec::new();

    if message.scope != shape.scope {
        fields.push("scope");
    }

    if !scope_data_matches(message) {
        fields.push("scope_data");
    }

    let data = message.code_data.clone().unwrap_or(JsonValue::Null);
    if !jsonschema::draft7::is_valid(&shape.code_data, &data) {
        fields.push("code_data");
    }

    if fields.is_empty() {
        Ok(())
    } else {
        Err(MessageError {
            code: message.code.to_string(),
            fields,
        })
    }
}

/// Quick check, `true` for custom codes.
pub fn is_valid(message: &Message) -> bool {
    validate(message).is_ok()
}

fn scope_data_matches(message: &Message) -> bool {
    let data = &message.scope_data;
    match message.scope {
        Scope::Sheet => data.is_empty(),
        Scope::Row => data.row.is_some(),
        Scope::Col => data.col.is_some(),
        Scope::Cell => data.row.is_some() && data.col.is_some(),
    }
}
