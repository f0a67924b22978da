//! Single cast units.

use serde_json::Value as JsonValue;

use crate::messaging::{MessageCode, Messenger};
use crate::value::Value;

/// A diagnostic attached to a failing [`Step`], recorded as an error by the
/// chain driver.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub code: MessageCode,
    pub data: Option<JsonValue>,
}

impl Diagnostic {
    pub fn new(code: impl Into<MessageCode>, data: Option<JsonValue>) -> Self {
        Self {
            code: code.into(),
            data,
        }
    }
}

/// What a cast hands back to its chain.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Keep going with this value.
    Continue(Value),
    /// Stop here, the chain succeeds with this value (null when absent).
    Success(Option<Value>),
    /// Stop here, the chain fails. A cast returning a failure without a
    /// diagnostic must have recorded one on the messenger itself.
    Failure(Option<Diagnostic>),
}

impl Step {
    pub fn fail(code: impl Into<MessageCode>, data: Option<JsonValue>) -> Self {
        Step::Failure(Some(Diagnostic::new(code, data)))
    }

    pub fn succeed(value: Value) -> Self {
        Step::Success(Some(value))
    }
}

/// One transformation/validation step of a [`CastChain`](super::CastChain).
///
/// Casts are configured once and called for every cell, so they take `&self`.
/// Any `Fn(Value, &mut Messenger) -> Step` closure is a cast.
pub trait Cast: Send + Sync {
    fn call(&self, value: Value, messenger: &mut Messenger) -> Step;
}

impl<F> Cast for F
where
    F: Fn(Value, &mut Messenger) -> Step + Send + Sync,
{
    fn call(&self, value: Value, messenger: &mut Messenger) -> Step {
        self(value, messenger)
    }
}
