//! Per-row processing.

use serde::Serialize;
use tracing::trace;

use crate::error::TypeResult;
use crate::headers::Header;
use crate::messaging::{Message, Messenger};
use crate::outcome::Outcome;
use crate::row_value_builder::{Record, RowValueBuilder};
use crate::sheet::SheetRow;

/// Outcome of one row, with the messages it produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowResult {
    pub row: usize,
    pub result: Outcome<Record>,
    pub messages: Vec<Message>,
}

impl RowResult {
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }
}

/// Casts the cells of each row according to resolved headers.
///
/// Rows never share state: each one gets its own messenger, duplicated from
/// the sheet messenger, and its own [`RowValueBuilder`].
pub struct RowProcessor<'a> {
    headers: &'a [Header],
    messenger: &'a Messenger,
}

impl<'a> RowProcessor<'a> {
    pub fn new(headers: &'a [Header], messenger: &'a Messenger) -> Self {
        Self { headers, messenger }
    }

    pub fn call(&self, row: SheetRow) -> TypeResult<RowResult> {
        let mut messenger = self.messenger.duplicate();
        messenger.rescope_row(row.row);

        let mut cells = row.cells;
        let mut builder = RowValueBuilder::new();

        for header in self.headers {
            let Some(cell) = header.row_value_index().and_then(|index| cells.get_mut(index)) else {
                continue;
            };
            let value = std::mem::take(&mut cell.value);
            let col = cell.col.clone();

            messenger.scope_col(col, |messenger| builder.add(&header.column, value, messenger))?;
        }

        let result = builder.result(&mut messenger)?;
        let messages = messenger.into_messages();

        trace!(
            row = row.row,
            success = result.is_success(),
            messages = messages.len(),
            "row processed"
        );

        Ok(RowResult {
            row: row.row,
            result,
            messages,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Column;
    use crate::headers::Headers;
    use crate::messaging::{MessageCode, Scope};
    use crate::sheet::{SheetHeader, SheetRow};
    use crate::specification::Specification;
    use crate::types::{scalars, Type};
    use crate::value::Value;
    use serde_json::json;
    use std::sync::Arc;

    fn specification() -> Specification {
        let mut spec = Specification::default();
        for (key, ty) in [("name", scalars::string()), ("email", scalars::email())] {
            let column = Column::new(key, Arc::new(Type::from(ty)), None, key, None, true).unwrap();
            spec.insert(column).unwrap();
        }
        spec
    }

    fn resolve(spec: &Specification, messenger: &mut Messenger) -> Vec<Header> {
        let headers = vec![
            SheetHeader::new("A", Some("email".into())),
            SheetHeader::new("B", Some("name".into())),
        ];
        Headers::resolve(spec, headers, messenger).into_value().unwrap()
    }

    #[test]
    fn test_success_row() {
        let spec = specification();
        let mut messenger = Messenger::new();
        let headers = resolve(&spec, &mut messenger);
        let processor = RowProcessor::new(&headers, &messenger);

        let row = SheetRow::from_values(1, vec![Value::from("a@b.c"), Value::from("Alice")], 2);
        let result = processor.call(row).unwrap();

        assert_eq!(result.row, 1);
        assert!(result.is_success());
        let record = result.result.into_value().unwrap();
        assert_eq!(record["email"], Value::from("a@b.c"));
        assert_eq!(record["name"], Value::from("Alice"));
        assert!(result.messages.is_empty());
    }

    #[test]
    fn test_cell_scoped_messages() {
        let spec = specification();
        let mut messenger = Messenger::new();
        let headers = resolve(&spec, &mut messenger);
        let processor = RowProcessor::new(&headers, &messenger);

        let row = SheetRow::from_values(7, vec![Value::from("nope"), Value::from(" Bob ")], 2);
        let result = processor.call(row).unwrap();

        assert_eq!(result.result, Outcome::empty_failure());
        assert_eq!(result.messages.len(), 2);

        let email = &result.messages[0];
        assert_eq!(email.code, MessageCode::MustBeEmail);
        assert_eq!(email.scope, Scope::Cell);
        assert_eq!(email.scope_data.row, Some(7));
        assert_eq!(email.scope_data.col.as_deref(), Some("A"));
        assert_eq!(email.code_data, Some(json!({ "value": "\"nope\"" })));

        let cleaned = &result.messages[1];
        assert_eq!(cleaned.code, MessageCode::CleanedString);
        assert_eq!(cleaned.scope_data.col.as_deref(), Some("B"));
    }

    #[test]
    fn test_rows_do_not_share_messages() {
        let spec = specification();
        let mut messenger = Messenger::new();
        let headers = resolve(&spec, &mut messenger);
        let processor = RowProcessor::new(&headers, &messenger);

        let first = processor
            .call(SheetRow::from_values(1, vec![Value::from("nope"), Value::from("A")], 2))
            .unwrap();
        let second = processor
            .call(SheetRow::from_values(2, vec![Value::from("a@b.c"), Value::from("B")], 2))
            .unwrap();

        assert_eq!(first.messages.len(), 1);
        assert!(second.messages.is_empty());
        assert!(second.is_success());
        assert!(messenger.messages().is_empty());
    }
}
