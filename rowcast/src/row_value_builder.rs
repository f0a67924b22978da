//! Per-row record assembly.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::column::Column;
use crate::error::TypeResult;
use crate::messaging::Messenger;
use crate::outcome::Outcome;
use crate::types::Type;
use crate::value::Value;

/// A processed row: attribute keys mapped to typed values.
pub type Record = BTreeMap<String, Value>;

/// Slot accumulator of one composite attribute.
#[derive(Debug)]
struct Slots {
    key: String,
    ty: Arc<Type>,
    values: Vec<Option<Value>>,
}

/// Builds one record from the cells of one row.
///
/// Every cell is cast, even after a failure, so that a row reports all of its
/// problems at once. Composite attributes are finished only once every cell
/// was added, and only if no cell failed.
#[derive(Debug, Default)]
pub struct RowValueBuilder {
    data: Record,
    composites: Vec<Slots>,
    failure: bool,
}

impl RowValueBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Casts one cell value with its column's type.
    pub fn add(
        &mut self,
        column: &Column,
        value: Value,
        messenger: &mut Messenger,
    ) -> TypeResult<Outcome<Value>> {
        let ty = column.ty();
        let outcome = ty.scalar(column.index(), value, messenger)?;

        match (&outcome, column.index()) {
            (Outcome::Success(value), Some(index)) => {
                let value = value.clone().unwrap_or_default();
                self.slots(column.key(), ty).values[index] = Some(value);
            }
            (Outcome::Success(value), None) => {
                let value = value.clone().unwrap_or_default();
                self.data.insert(column.key().to_string(), value);
            }
            (Outcome::Failure(_), _) => self.failure = true,
        }

        Ok(outcome)
    }

    fn slots(&mut self, key: &str, ty: &Arc<Type>) -> &mut Slots {
        let position = self
            .composites
            .iter()
            .position(|slots| slots.key == key && Arc::ptr_eq(&slots.ty, ty));

        let position = position.unwrap_or_else(|| {
            self.composites.push(Slots {
                key: key.to_string(),
                ty: ty.clone(),
                values: vec![None; ty.slots()],
            });
            self.composites.len() - 1
        });

        &mut self.composites[position]
    }

    pub fn has_failed(&self) -> bool {
        self.failure
    }

    /// Finishes composites and yields the record.
    ///
    /// An empty failure when any cell failed, or when a composite cast fails
    /// (remaining composites are then skipped).
    pub fn result(self, messenger: &mut Messenger) -> TypeResult<Outcome<Record>> {
        if self.failure {
            return Ok(Outcome::empty_failure());
        }

        let mut data = self.data;

        for slots in self.composites {
            let assembled =
                Value::Array(slots.values.into_iter().map(Option::unwrap_or_default).collect());
            let outcome = slots.ty.composite(assembled, messenger)?;

            match outcome.try_value() {
                Ok(value) => {
                    data.insert(slots.key, value.unwrap_or_default());
                }
                Err(escape) => return Ok(escape.into()),
            }
        }

        Ok(Outcome::success(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::MessageCode;
    use crate::types::{composites, scalars};

    fn scalar_column(key: &str) -> Column {
        let ty = Arc::new(Type::from(scalars::string()));
        Column::new(key, ty, None, key, None, false).unwrap()
    }

    fn composite_columns(key: &str, ty: Type) -> Vec<Column> {
        let ty = Arc::new(ty);
        (0..ty.slots())
            .map(|i| {
                let header = format!("{} {}", key, i + 1);
                Column::new(key, ty.clone(), Some(i), header, None, false).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_scalar_and_composite() {
        let foo = scalar_column("foo");
        let bar_type = Type::from(composites::array(vec![scalars::scalar(); 5]));
        let bar = composite_columns("bar", bar_type);
        let mut messenger = Messenger::new();
        let mut builder = RowValueBuilder::new();

        builder.add(&bar[4], Value::from("e"), &mut messenger).unwrap();
        builder.add(&foo, Value::from("hello"), &mut messenger).unwrap();
        builder.add(&bar[2], Value::from("c"), &mut messenger).unwrap();
        builder.add(&bar[0], Value::Null, &mut messenger).unwrap();

        let record = builder.result(&mut messenger).unwrap().into_value().unwrap();
        assert_eq!(record["foo"], Value::from("hello"));
        assert_eq!(
            record["bar"],
            Value::Array(vec![
                Value::Null,
                Value::Null,
                Value::from("c"),
                Value::Null,
                Value::from("e"),
            ])
        );
    }

    #[test]
    fn test_failure_keeps_collecting() {
        let email = {
            let ty = Arc::new(Type::from(scalars::email()));
            Column::new("email", ty, None, "Email", None, false).unwrap()
        };
        let foo = scalar_column("foo");
        let mut messenger = Messenger::new();
        let mut builder = RowValueBuilder::new();

        assert!(builder.add(&email, Value::from("nope"), &mut messenger).unwrap().is_failure());
        assert!(builder.add(&foo, Value::from(42i64), &mut messenger).unwrap().is_failure());
        assert!(builder.has_failed());

        let outcome = builder.result(&mut messenger).unwrap();
        assert_eq!(outcome, Outcome::empty_failure());

        let codes: Vec<_> = messenger.messages().iter().map(|m| m.code.clone()).collect();
        assert_eq!(codes, vec![MessageCode::MustBeEmail, MessageCode::MustBeString]);
    }

    #[test]
    fn test_composite_not_finished_after_slot_failure() {
        let bar = composite_columns(
            "bar",
            Type::from(composites::array(vec![scalars::scalar(), scalars::email()])),
        );
        let mut messenger = Messenger::new();
        let mut builder = RowValueBuilder::new();

        builder.add(&bar[0], Value::from("a"), &mut messenger).unwrap();
        builder.add(&bar[1], Value::from("b"), &mut messenger).unwrap();

        assert!(builder.result(&mut messenger).unwrap().is_failure());
        assert_eq!(messenger.messages().len(), 1);
    }

    #[test]
    fn test_composite_cast_failure() {
        let failing = composites::array(vec![scalars::scalar()])
            .cast(|_: Value, _: &mut Messenger| crate::types::Step::fail("must_be_odd", None));
        let bar = composite_columns("bar", Type::from(failing));
        let mut messenger = Messenger::new();
        let mut builder = RowValueBuilder::new();

        builder.add(&bar[0], Value::from("a"), &mut messenger).unwrap();

        assert_eq!(builder.result(&mut messenger).unwrap(), Outcome::empty_failure());
        assert_eq!(messenger.messages()[0].code, MessageCode::from("must_be_odd"));
    }

    #[test]
    fn test_array_compact() {
        let bar_type = Type::from(composites::array_compact(vec![scalars::scalar(); 5]));
        let bar = composite_columns("bar", bar_type);
        let mut messenger = Messenger::new();
        let mut builder = RowValueBuilder::new();

        builder.add(&bar[2], Value::from("x"), &mut messenger).unwrap();
        builder.add(&bar[4], Value::from("y"), &mut messenger).unwrap();

        let record = builder.result(&mut messenger).unwrap().into_value().unwrap();
        assert_eq!(record["bar"], Value::from(vec!["x", "y"]));
    }
}
