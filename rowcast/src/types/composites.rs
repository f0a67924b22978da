//! Built-in composite casts and composite types.

use super::cast::{Cast, Step};
use super::{CastChain, CompositeType, ScalarType};
use crate::messaging::{MessageCode, Messenger};
use crate::value::Value;

/// Fails with `must_be_array` unless the value is an array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArrayCast;

impl Cast for ArrayCast {
    fn call(&self, value: Value, _messenger: &mut Messenger) -> Step {
        match value {
            Value::Array(_) => Step::Continue(value),
            _ => Step::fail(MessageCode::MustBeArray, None),
        }
    }
}

/// Drops null items from an array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompactCast;

impl Cast for CompactCast {
    fn call(&self, value: Value, _messenger: &mut Messenger) -> Step {
        match value {
            Value::Array(items) => {
                Step::Continue(Value::Array(items.into_iter().filter(|v| !v.is_null()).collect()))
            }
            other => Step::Continue(other),
        }
    }
}

pub fn array(scalars: Vec<ScalarType>) -> CompositeType {
    CompositeType::new(scalars, CastChain::new().append(ArrayCast))
}

pub fn array_compact(scalars: Vec<ScalarType>) -> CompositeType {
    array(scalars).cast(CompactCast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use crate::types::scalars;

    #[test]
    fn test_array_requires_array() {
        let ty = array(vec![scalars::scalar()]);
        let mut messenger = Messenger::new();

        let outcome = ty.call(Value::from("x"), &mut messenger);
        assert!(outcome.is_failure());
        assert_eq!(messenger.messages()[0].code, MessageCode::MustBeArray);
    }

    #[test]
    fn test_array_keeps_nulls() {
        let ty = array(vec![scalars::scalar(); 3]);
        let value = Value::from(vec![Value::Null, Value::from("x"), Value::Null]);

        let outcome = ty.call(value.clone(), &mut Messenger::new());
        assert_eq!(outcome, Outcome::success(value));
    }

    #[test]
    fn test_array_compact_strips_nulls() {
        let ty = array_compact(vec![scalars::scalar(); 5]);
        let value = Value::from(vec![
            Value::Null,
            Value::Null,
            Value::from("x"),
            Value::Null,
            Value::from("y"),
        ]);

        let outcome = ty.call(value, &mut Messenger::new());
        assert_eq!(
            outcome,
            Outcome::success(Value::from(vec!["x", "y"]))
        );
    }
}
