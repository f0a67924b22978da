//! Named type registry.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use super::{composites, scalars, CompositeType, ScalarType};
use crate::error::{TypeError, TypeResult};

pub type ScalarBuilder = Arc<dyn Fn() -> ScalarType + Send + Sync>;
pub type CompositeBuilder = Arc<dyn Fn(Vec<ScalarType>) -> CompositeType + Send + Sync>;

/// Maps type names to type builders.
///
/// The default container knows the scalars `scalar`, `string`, `email`,
/// `boolsy`, `date_string` and the composites `array`, `array_compact`.
/// Registering a name again overrides the previous builder.
#[derive(Clone)]
pub struct TypeContainer {
    scalars: HashMap<String, ScalarBuilder>,
    composites: HashMap<String, CompositeBuilder>,
}

impl Default for TypeContainer {
    fn default() -> Self {
        Self::empty()
            .with_scalar("scalar", scalars::scalar)
            .with_scalar("string", scalars::string)
            .with_scalar("email", scalars::email)
            .with_scalar("boolsy", scalars::boolsy)
            .with_scalar("date_string", scalars::date_string)
            .with_composite("array", composites::array)
            .with_composite("array_compact", composites::array_compact)
    }
}

impl TypeContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A container without any type.
    pub fn empty() -> Self {
        Self {
            scalars: HashMap::new(),
            composites: HashMap::new(),
        }
    }

    pub fn with_scalar<F>(mut self, name: impl Into<String>, builder: F) -> Self
    where
        F: Fn() -> ScalarType + Send + Sync + 'static,
    {
        self.scalars.insert(name.into(), Arc::new(builder));
        self
    }

    pub fn with_composite<F>(mut self, name: impl Into<String>, builder: F) -> Self
    where
        F: Fn(Vec<ScalarType>) -> CompositeType + Send + Sync + 'static,
    {
        self.composites.insert(name.into(), Arc::new(builder));
        self
    }

    /// Registered scalar names, sorted.
    pub fn scalars(&self) -> Vec<&str> {
        sorted_names(self.scalars.keys())
    }

    /// Registered composite names, sorted.
    pub fn composites(&self) -> Vec<&str> {
        sorted_names(self.composites.keys())
    }

    pub fn scalar(&self, name: &str) -> TypeResult<ScalarType> {
        let builder = self
            .scalars
            .get(name)
            .ok_or_else(|| TypeError::UnknownScalar(name.to_string()))?;
        Ok(builder())
    }

    /// Builds a composite type from its name and the names of its slots.
    pub fn composite<S: AsRef<str>>(
        &self,
        name: &str,
        scalar_names: &[S],
    ) -> TypeResult<CompositeType> {
        let builder = self
            .composites
            .get(name)
            .ok_or_else(|| TypeError::UnknownComposite(name.to_string()))?;

        let scalars = scalar_names
            .iter()
            .map(|scalar_name| self.scalar(scalar_name.as_ref()))
            .collect::<TypeResult<Vec<_>>>()?;

        Ok(builder(scalars))
    }
}

fn sorted_names<'a>(names: impl Iterator<Item = &'a String>) -> Vec<&'a str> {
    let mut names: Vec<&str> = names.map(String::as_str).collect();
    names.sort_unstable();
    names
}

impl fmt::Debug for TypeContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeContainer")
            .field("scalars", &self.scalars())
            .field("composites", &self.composites())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::Messenger;
    use crate::outcome::Outcome;
    use crate::types::{ScalarCast, Step};
    use crate::value::Value;

    #[test]
    fn test_default_names() {
        let container = TypeContainer::default();
        assert_eq!(
            container.scalars(),
            vec!["boolsy", "date_string", "email", "scalar", "string"]
        );
        assert_eq!(container.composites(), vec!["array", "array_compact"]);
    }

    #[test]
    fn test_unknown_names() {
        let container = TypeContainer::default();
        assert_eq!(
            container.scalar("foo").unwrap_err(),
            TypeError::UnknownScalar("foo".into())
        );
        assert_eq!(
            container.composite("foo", &["string"]).unwrap_err(),
            TypeError::UnknownComposite("foo".into())
        );
        assert_eq!(
            container.composite("array", &["string", "bar"]).unwrap_err(),
            TypeError::UnknownScalar("bar".into())
        );
    }

    #[test]
    fn test_composite_from_names() {
        let container = TypeContainer::default();
        let ty = container.composite("array", &["string", "email", "scalar"]).unwrap();
        assert_eq!(ty.slots(), 3);
    }

    #[test]
    fn test_extend_and_override() {
        let container = TypeContainer::default()
            .with_scalar("reverse_string", || {
                scalars::string().cast(|value: Value, _: &mut Messenger| match value {
                    Value::String(s) => Step::Continue(Value::String(s.chars().rev().collect())),
                    other => Step::Continue(other),
                })
            })
            .with_scalar("scalar", || ScalarType::base(ScalarCast::required()));

        let reverse = container.scalar("reverse_string").unwrap();
        assert_eq!(
            reverse.call(Value::from("hello"), &mut Messenger::new()),
            Outcome::success(Value::from("olleh"))
        );

        let scalar = container.scalar("scalar").unwrap();
        assert!(scalar.call(Value::Null, &mut Messenger::new()).is_failure());
        assert!(container.scalars().contains(&"reverse_string"));
    }
}
