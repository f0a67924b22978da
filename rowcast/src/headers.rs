//! Header resolution.
//!
//! Matches the actual header row of a sheet against a [`Specification`],
//! once per sheet. Problems are recorded on the messenger:
//!
//! - `invalid_header` (COL, error): no column matches and unspecified
//!   columns are not allowed
//! - `ignored_column` (COL, warning): no column matches, unspecified columns
//!   are allowed and their reporting is enabled
//! - `duplicated_header` (COL, error): the column was already matched by an
//!   earlier header
//! - `missing_column` (SHEET, error): one per required column left unmatched

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tracing::debug;

use crate::column::Column;
use crate::messaging::{MessageCode, Messenger};
use crate::outcome::Outcome;
use crate::sheet::SheetHeader;
use crate::specification::Specification;

/// An actual header paired with the column it resolved to.
#[derive(Debug, Clone)]
pub struct Header {
    pub header: SheetHeader,
    pub column: Arc<Column>,
}

impl Header {
    pub fn row_value_index(&self) -> Option<usize> {
        self.header.row_value_index()
    }
}

impl PartialEq for Header {
    fn eq(&self, other: &Self) -> bool {
        self.header == other.header && Arc::ptr_eq(&self.column, &other.column)
    }
}

/// One header resolution pass.
pub struct Headers<'a> {
    specification: &'a Specification,
    headers: Vec<Header>,
    consumed: HashSet<usize>,
    failure: bool,
}

impl<'a> Headers<'a> {
    pub fn new(specification: &'a Specification) -> Self {
        Self {
            specification,
            headers: Vec::new(),
            consumed: HashSet::new(),
            failure: false,
        }
    }

    /// Resolves a whole header row.
    pub fn resolve(
        specification: &Specification,
        headers: impl IntoIterator<Item = SheetHeader>,
        messenger: &mut Messenger,
    ) -> Outcome<Vec<Header>> {
        let mut pass = Headers::new(specification);
        for header in headers {
            pass.add(header, messenger);
        }
        pass.result(messenger)
    }

    /// Resolves one actual header, scoping diagnostics to its column.
    pub fn add(&mut self, header: SheetHeader, messenger: &mut Messenger) {
        let specification = self.specification;
        let col = header.col.clone();
        messenger.scope_col(col, |messenger| {
            let Some((position, column)) = specification.resolve(header.value.as_deref()) else {
                self.unspecified(&header, messenger);
                return;
            };

            if !self.consumed.insert(position) {
                self.failure = true;
                messenger.error(MessageCode::DuplicatedHeader, Some(json!(header.value)));
                return;
            }

            let column = column.clone();
            self.headers.push(Header { header, column });
        });
    }

    fn unspecified(&mut self, header: &SheetHeader, messenger: &mut Messenger) {
        if !self.specification.ignore_unspecified_columns() {
            self.failure = true;
            messenger.error(MessageCode::InvalidHeader, Some(json!(header.value)));
        } else if self.specification.report_ignored_columns() {
            messenger.warn(MessageCode::IgnoredColumn, Some(json!(header.value)));
        }
    }

    /// Finishes the pass: reports missing required columns, then yields the
    /// accepted headers unless anything went wrong.
    pub fn result(mut self, messenger: &mut Messenger) -> Outcome<Vec<Header>> {
        for (position, column) in self.specification.required_columns() {
            if !self.consumed.contains(&position) {
                self.failure = true;
                messenger.error(MessageCode::MissingColumn, Some(json!(column.header())));
            }
        }

        if self.failure {
            Outcome::empty_failure()
        } else {
            debug!(columns = self.headers.len(), "headers resolved");
            Outcome::success(self.headers)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::HeaderPattern;
    use crate::messaging::{Scope, Severity};
    use crate::types::{scalars, Type};

    fn spec(ignore: bool, report: bool) -> Specification {
        let ty = Arc::new(Type::from(scalars::string()));
        let mut spec = Specification::new(ignore, report);
        let columns = [("foo", "Foo", true), ("bar", "Bar", false), ("baz", "Baz", true)];
        for (key, header, required) in columns {
            let pattern = HeaderPattern::ignore_case(header).unwrap();
            let column =
                Column::new(key, ty.clone(), None, header, Some(pattern), required).unwrap();
            spec.insert(column).unwrap();
        }
        spec
    }

    fn headers(values: &[&str]) -> Vec<SheetHeader> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| SheetHeader::new(crate::sheet::col_label(i), Some(v.to_string())))
            .collect()
    }

    #[test]
    fn test_all_resolved() {
        let spec = spec(false, false);
        let mut messenger = Messenger::new();

        let outcome = Headers::resolve(&spec, headers(&["baz", "FOO"]), &mut messenger);

        let resolved = outcome.into_value().unwrap();
        let keys: Vec<_> = resolved.iter().map(|h| h.column.key()).collect();
        assert_eq!(keys, vec!["baz", "foo"]);
        assert_eq!(resolved[1].row_value_index(), Some(1));
        assert!(messenger.messages().is_empty());
    }

    #[test]
    fn test_invalid_header() {
        let spec = spec(false, true);
        let mut messenger = Messenger::new();

        let outcome = Headers::resolve(&spec, headers(&["foo", "oops", "baz"]), &mut messenger);

        assert_eq!(outcome, Outcome::empty_failure());
        assert_eq!(messenger.messages().len(), 1);
        let message = &messenger.messages()[0];
        assert_eq!(message.code, MessageCode::InvalidHeader);
        assert_eq!(message.scope, Scope::Col);
        assert_eq!(message.scope_data.col.as_deref(), Some("B"));
        assert_eq!(message.code_data, Some(json!("oops")));
        assert_eq!(messenger.scope(), Scope::Sheet);
    }

    #[test]
    fn test_ignored_column() {
        let mut messenger = Messenger::new();
        let actual = headers(&["foo", "oops", "baz"]);
        let outcome = Headers::resolve(&spec(true, false), actual, &mut messenger);
        assert!(outcome.is_success());
        assert!(messenger.messages().is_empty());

        let mut messenger = Messenger::new();
        let actual = headers(&["foo", "oops", "baz"]);
        let outcome = Headers::resolve(&spec(true, true), actual, &mut messenger);
        assert_eq!(outcome.value().map(Vec::len), Some(2));
        assert_eq!(messenger.messages()[0].code, MessageCode::IgnoredColumn);
        assert_eq!(messenger.messages()[0].severity, Severity::Warn);
    }

    #[test]
    fn test_duplicated_header() {
        let spec = spec(false, false);
        let mut messenger = Messenger::new();

        let outcome = Headers::resolve(&spec, headers(&["Foo", "baz", "Foo"]), &mut messenger);

        assert!(outcome.is_failure());
        assert_eq!(messenger.messages().len(), 1);
        let message = &messenger.messages()[0];
        assert_eq!(message.code, MessageCode::DuplicatedHeader);
        assert_eq!(message.scope_data.col.as_deref(), Some("C"));
        assert_eq!(message.code_data, Some(json!("Foo")));
    }

    #[test]
    fn test_missing_columns() {
        let spec = spec(false, false);
        let mut messenger = Messenger::new();

        let outcome = Headers::resolve(&spec, headers(&["bar"]), &mut messenger);

        assert!(outcome.is_failure());
        let missing: Vec<_> = messenger
            .messages()
            .iter()
            .map(|m| (m.code.clone(), m.scope, m.code_data.clone()))
            .collect();
        assert_eq!(
            missing,
            vec![
                (MessageCode::MissingColumn, Scope::Sheet, Some(json!("Foo"))),
                (MessageCode::MissingColumn, Scope::Sheet, Some(json!("Baz"))),
            ]
        );
    }

    #[test]
    fn test_null_header_is_unspecified() {
        let spec = spec(false, false);
        let mut messenger = Messenger::new();
        let row = vec![
            SheetHeader::new("A", Some("foo".into())),
            SheetHeader::new("B", None),
            SheetHeader::new("C", Some("baz".into())),
        ];

        assert!(Headers::resolve(&spec, row, &mut messenger).is_failure());
        assert_eq!(messenger.messages()[0].code_data, Some(serde_json::Value::Null));
    }
}
