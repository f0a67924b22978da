//! Success/Failure outcomes with an optional carried value.
//!
//! [`Outcome`] is what every processing step hands back: casts, header
//! resolution, row building and whole sheets. Unlike [`Result`], both variants
//! may be *empty*, and an empty outcome is distinct from one carrying a null
//! cell value: `Outcome::Success(None)` means "nothing to report", while
//! `Outcome::Success(Some(Value::Null))` is a successfully cast empty cell.
//!
//! An empty failure is the usual way of saying "look at the messenger for
//! details".
//!
//! # Short-circuit composition
//!
//! [`Outcome::run`] plays the role of a `Do` block: inside the closure,
//! [`Outcome::try_value`] yields the carried value of a success, or escapes the
//! closure through `?` with the failure.
//!
//! ```
//! use rowcast::Outcome;
//!
//! let halve = |n: i64| -> Outcome<i64> {
//!     if n % 2 == 0 { Outcome::success(n / 2) } else { Outcome::empty_failure() }
//! };
//!
//! let quarter: Outcome<i64> = Outcome::run(|| {
//!     let half = halve(12).try_value()?.unwrap_or_default();
//!     let quarter = halve(half).try_value()?.unwrap_or_default();
//!     Ok(Outcome::success(quarter))
//! });
//! assert_eq!(quarter, Outcome::success(3));
//!
//! let odd: Outcome<i64> = Outcome::run(|| {
//!     let half = halve(6).try_value()?.unwrap_or_default();
//!     let quarter = halve(half).try_value()?.unwrap_or_default();
//!     Ok(Outcome::success(quarter))
//! });
//! assert_eq!(odd, Outcome::empty_failure());
//! ```

use serde::Serialize;

/// Two-variant outcome, each variant carrying at most one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Outcome<T, E = ()> {
    Success(Option<T>),
    Failure(Option<E>),
}

/// A failure escaping an [`Outcome::run`] block.
///
/// Produced by [`Outcome::try_value`]; only meant to travel through `?`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Escape<E>(Option<E>);

impl<E> Escape<E> {
    /// The failure value that triggered the escape, if any.
    pub fn into_inner(self) -> Option<E> {
        self.0
    }
}

impl<T, E> Outcome<T, E> {
    pub fn success(value: T) -> Self {
        Outcome::Success(Some(value))
    }

    pub fn empty_success() -> Self {
        Outcome::Success(None)
    }

    pub fn failure(value: E) -> Self {
        Outcome::Failure(Some(value))
    }

    pub fn empty_failure() -> Self {
        Outcome::Failure(None)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Outcome::Failure(_))
    }

    /// Whether the outcome carries no value, whatever its variant.
    pub fn is_empty(&self) -> bool {
        matches!(self, Outcome::Success(None) | Outcome::Failure(None))
    }

    /// Drops the carried value, keeping the variant.
    pub fn discard<U, F>(self) -> Outcome<U, F> {
        match self {
            Outcome::Success(_) => Outcome::Success(None),
            Outcome::Failure(_) => Outcome::Failure(None),
        }
    }

    /// The value carried by a success.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Success(value) => value.as_ref(),
            Outcome::Failure(_) => None,
        }
    }

    /// The value carried by a failure.
    pub fn failure_value(&self) -> Option<&E> {
        match self {
            Outcome::Success(_) => None,
            Outcome::Failure(value) => value.as_ref(),
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Outcome::Success(value) => value,
            Outcome::Failure(_) => None,
        }
    }

    /// Unwraps a success for use inside [`Outcome::run`].
    ///
    /// A success yields its (optional) value; a failure becomes an [`Escape`]
    /// so that `?` aborts the enclosing block with that failure.
    pub fn try_value(self) -> Result<Option<T>, Escape<E>> {
        match self {
            Outcome::Success(value) => Ok(value),
            Outcome::Failure(value) => Err(Escape(value)),
        }
    }

    /// Runs a block of fallible steps, turning an escaped failure back into
    /// the block's outcome.
    pub fn run<F>(block: F) -> Self
    where
        F: FnOnce() -> Result<Self, Escape<E>>,
    {
        match block() {
            Ok(outcome) => outcome,
            Err(Escape(value)) => Outcome::Failure(value),
        }
    }

    pub fn map<U, F>(self, f: F) -> Outcome<U, E>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            Outcome::Success(value) => Outcome::Success(value.map(f)),
            Outcome::Failure(value) => Outcome::Failure(value),
        }
    }

    /// Calls `f` with the success value (if the outcome is a success).
    pub fn on_success<F>(self, f: F) -> Self
    where
        F: FnOnce(Option<&T>),
    {
        if let Outcome::Success(value) = &self {
            f(value.as_ref());
        }
        self
    }

    /// Calls `f` with the failure value (if the outcome is a failure).
    pub fn on_failure<F>(self, f: F) -> Self
    where
        F: FnOnce(Option<&E>),
    {
        if let Outcome::Failure(value) = &self {
            f(value.as_ref());
        }
        self
    }
}

impl<T, E> From<Escape<E>> for Outcome<T, E> {
    fn from(escape: Escape<E>) -> Self {
        Outcome::Failure(escape.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_not_null() {
        let empty: Outcome<Option<i32>> = Outcome::empty_success();
        let null: Outcome<Option<i32>> = Outcome::success(None);

        assert_ne!(empty, null);
        assert!(empty.is_empty());
        assert!(!null.is_empty());
    }

    #[test]
    fn test_variants_compare_structurally() {
        assert_eq!(Outcome::<_, ()>::success(1), Outcome::success(1));
        assert_ne!(Outcome::<i32, i32>::success(1), Outcome::failure(1));
        assert_eq!(Outcome::<(), ()>::empty_failure(), Outcome::empty_failure());
    }

    #[test]
    fn test_discard_keeps_variant() {
        let success: Outcome<i32, &str> = Outcome::success(42);
        let failure: Outcome<i32, &str> = Outcome::failure("boom");

        assert_eq!(success.discard::<(), ()>(), Outcome::empty_success());
        assert_eq!(failure.discard::<(), ()>(), Outcome::empty_failure());
    }

    #[test]
    fn test_run_stops_at_first_failure() {
        let mut visited = Vec::new();

        let outcome: Outcome<i32, &str> = Outcome::run(|| {
            visited.push(1);
            Outcome::<i32, &str>::success(1).try_value()?;
            visited.push(2);
            Outcome::<i32, &str>::failure("second").try_value()?;
            visited.push(3);
            Ok(Outcome::success(3))
        });

        assert_eq!(outcome, Outcome::failure("second"));
        assert_eq!(visited, vec![1, 2]);
    }

    #[test]
    fn test_run_yields_block_result() {
        let outcome: Outcome<i32> = Outcome::run(|| {
            let a = Outcome::<i32>::success(20).try_value()?.unwrap_or_default();
            let b = Outcome::<i32>::empty_success().try_value()?.unwrap_or(22);
            Ok(Outcome::success(a + b))
        });

        assert_eq!(outcome, Outcome::success(42));
    }

    #[test]
    fn test_callbacks() {
        let mut seen = None;
        let mut failed = false;

        Outcome::<i32, ()>::success(7)
            .on_success(|v| seen = v.copied())
            .on_failure(|_| failed = true);

        assert_eq!(seen, Some(7));
        assert!(!failed);
    }

    #[test]
    fn test_serialize_shape() {
        let json = serde_json::to_value(Outcome::<i32>::success(1)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "success", "value": 1 }));

        let json = serde_json::to_value(Outcome::<i32>::empty_failure()).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "failure", "value": null }));
    }
}
