//! Type & cast chain engine.
//!
//! A [`Type`] is either a [`ScalarType`] (one value per cell) or a
//! [`CompositeType`] (an ordered group of scalar slots assembled into one
//! array value). Both own a [`CastChain`]: scalar chains run on each cell,
//! composite chains run once on the assembled slot array.
//!
//! Types are immutable values. New types are derived by appending a cast to
//! an existing type, which leaves the parent untouched:
//!
//! ```
//! use rowcast::types::{scalars, Step};
//! use rowcast::{Messenger, Outcome, Value};
//!
//! let reverse_string = scalars::string().cast(|value: Value, _: &mut Messenger| match value {
//!     Value::String(s) => Step::Continue(Value::String(s.chars().rev().collect())),
//!     other => Step::Continue(other),
//! });
//!
//! let mut messenger = Messenger::new();
//! assert_eq!(
//!     reverse_string.call(Value::from("hello"), &mut messenger),
//!     Outcome::success(Value::from("olleh"))
//! );
//! ```

pub mod cast;
pub mod chain;
pub mod composites;
pub mod container;
pub mod scalars;

use crate::error::{TypeError, TypeResult};
use crate::messaging::Messenger;
use crate::outcome::Outcome;
use crate::value::Value;

pub use cast::{Cast, Diagnostic, Step};
pub use chain::CastChain;
pub use composites::{ArrayCast, CompactCast};
pub use container::TypeContainer;
pub use scalars::{BoolsyCast, DateStringCast, EmailCast, ScalarCast, StringCast};

// =============================================================================
// ScalarType
// =============================================================================

/// A type producing one value per cell.
#[derive(Debug, Clone, Default)]
pub struct ScalarType {
    chain: CastChain,
}

impl ScalarType {
    pub fn new(chain: CastChain) -> Self {
        Self { chain }
    }

    /// A type whose chain starts with `cast`.
    pub fn base<C: Cast + 'static>(cast: C) -> Self {
        Self::new(CastChain::new().append(cast))
    }

    /// Derives a new type running one more cast.
    pub fn cast<C: Cast + 'static>(&self, cast: C) -> Self {
        Self::new(self.chain.append(cast))
    }

    pub fn chain(&self) -> &CastChain {
        &self.chain
    }

    pub fn call(&self, value: Value, messenger: &mut Messenger) -> Outcome<Value> {
        self.chain.call(value, messenger)
    }
}

// =============================================================================
// CompositeType
// =============================================================================

/// A type aggregating several scalar slots into one array value.
#[derive(Debug, Clone)]
pub struct CompositeType {
    scalars: Vec<ScalarType>,
    chain: CastChain,
}

impl CompositeType {
    pub fn new(scalars: Vec<ScalarType>, chain: CastChain) -> Self {
        Self { scalars, chain }
    }

    /// Derives a new composite type running one more cast on the assembled
    /// value.
    pub fn cast<C: Cast + 'static>(&self, cast: C) -> Self {
        Self::new(self.scalars.clone(), self.chain.append(cast))
    }

    pub fn slots(&self) -> usize {
        self.scalars.len()
    }

    pub fn slot(&self, index: usize) -> Option<&ScalarType> {
        self.scalars.get(index)
    }

    pub fn chain(&self) -> &CastChain {
        &self.chain
    }

    pub fn call(&self, value: Value, messenger: &mut Messenger) -> Outcome<Value> {
        self.chain.call(value, messenger)
    }
}

// =============================================================================
// Type
// =============================================================================

/// A compiled column type.
#[derive(Debug, Clone)]
pub enum Type {
    Scalar(ScalarType),
    Composite(CompositeType),
}

impl Type {
    pub fn is_composite(&self) -> bool {
        matches!(self, Type::Composite(_))
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Scalar(_))
    }

    /// Number of slots, zero for scalars.
    pub fn slots(&self) -> usize {
        match self {
            Type::Scalar(_) => 0,
            Type::Composite(composite) => composite.slots(),
        }
    }

    /// Casts one cell value.
    ///
    /// Scalars reject any index; composites require a valid slot index and
    /// delegate to that slot's type.
    pub fn scalar(
        &self,
        index: Option<usize>,
        value: Value,
        messenger: &mut Messenger,
    ) -> TypeResult<Outcome<Value>> {
        match (self, index) {
            (Type::Scalar(scalar), None) => Ok(scalar.call(value, messenger)),
            (Type::Scalar(_), Some(index)) => Err(TypeError::ScalarIndexed(index)),
            (Type::Composite(composite), index) => {
                let slot = index.and_then(|i| composite.slot(i)).ok_or(TypeError::InvalidIndex {
                    index,
                    slots: composite.slots(),
                })?;
                Ok(slot.call(value, messenger))
            }
        }
    }

    /// Casts an assembled slot array.
    pub fn composite(&self, value: Value, messenger: &mut Messenger) -> TypeResult<Outcome<Value>> {
        match self {
            Type::Scalar(_) => Err(TypeError::NotComposite),
            Type::Composite(composite) => Ok(composite.call(value, messenger)),
        }
    }
}

impl From<ScalarType> for Type {
    fn from(scalar: ScalarType) -> Self {
        Type::Scalar(scalar)
    }
}

impl From<CompositeType> for Type {
    fn from(composite: CompositeType) -> Self {
        Type::Composite(composite)
    }
}
