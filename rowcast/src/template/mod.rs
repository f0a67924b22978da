//! Declarative templates.
//!
//! A template lists the attributes a processed row must produce. Each
//! attribute has a key and a type declaration:
//!
//! - a scalar type name: `"email"`
//! - a list of slot type names, shorthand for the `array` composite:
//!   `["string", "email"]`
//! - an explicit composite: `{ "composite": "array_compact", "scalars": [...] }`
//!
//! A trailing `!` on a scalar or slot name marks its column as required.
//!
//! Templates are usually loaded from JSON documents:
//!
//! ```json
//! {
//!   "attributes": [
//!     { "key": "foo", "type": "string!" },
//!     { "key": "bar", "type": ["string", "scalar", "email", "scalar", "scalar!"] }
//!   ],
//!   "ignore_unspecified_columns": false,
//!   "report_ignored_columns": false
//! }
//! ```
//!
//! [`Template::apply`] compiles the template into a [`Specification`], one
//! column per scalar attribute and one per composite slot.

mod config;

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::column::Column;
use crate::error::{SpecError, SpecResult};
use crate::specification::Specification;
use crate::types::Type;

pub use config::{default_header, TemplateConfig};

/// Marker of required columns.
const REQUIRED_SUFFIX: char = '!';

/// Declared type of an attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    Scalar(String),
    Slots(Vec<String>),
    Composite { composite: String, scalars: Vec<String> },
}

impl TypeDecl {
    pub fn scalar(name: impl Into<String>) -> Self {
        TypeDecl::Scalar(name.into())
    }

    pub fn composite(name: impl Into<String>, scalars: &[&str]) -> Self {
        TypeDecl::Composite {
            composite: name.into(),
            scalars: scalars.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Splits the required marker off a type name.
fn parse_name(name: &str) -> (&str, bool) {
    match name.strip_suffix(REQUIRED_SUFFIX) {
        Some(name) => (name, true),
        None => (name, false),
    }
}

/// One declared attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(rename = "type")]
    pub ty: TypeDecl,
}

impl Attribute {
    pub fn new(key: impl Into<String>, ty: TypeDecl) -> Self {
        Self { key: key.into(), ty }
    }

    /// Compiles the attribute's type and builds its columns.
    pub fn columns(&self, config: &TemplateConfig) -> SpecResult<Vec<Column>> {
        match &self.ty {
            TypeDecl::Scalar(name) => {
                let (name, required) = parse_name(name);
                let ty = Arc::new(Type::from(config.types.scalar(name)?));
                Ok(vec![self.column(config, ty, None, required)?])
            }
            TypeDecl::Slots(scalars) => self.composite_columns(config, "array", scalars),
            TypeDecl::Composite { composite, scalars } => {
                self.composite_columns(config, composite, scalars)
            }
        }
    }

    fn composite_columns(
        &self,
        config: &TemplateConfig,
        composite: &str,
        scalars: &[String],
    ) -> SpecResult<Vec<Column>> {
        let slots: Vec<(&str, bool)> = scalars.iter().map(|name| parse_name(name)).collect();
        let names: Vec<&str> = slots.iter().map(|(name, _)| *name).collect();

        // All slot columns share the compiled composite.
        let ty = Arc::new(Type::from(config.types.composite(composite, &names)?));

        slots
            .iter()
            .enumerate()
            .map(|(index, (_, required))| self.column(config, ty.clone(), Some(index), *required))
            .collect()
    }

    fn column(
        &self,
        config: &TemplateConfig,
        ty: Arc<Type>,
        index: Option<usize>,
        required: bool,
    ) -> SpecResult<Column> {
        let (header, pattern) = config.header(&self.key, index)?;
        Ok(Column::new(self.key.clone(), ty, index, header, Some(pattern), required)?)
    }
}

/// Developer-authored structure of the rows to process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    attributes: Vec<Attribute>,
    #[serde(default)]
    ignore_unspecified_columns: bool,
    #[serde(default)]
    report_ignored_columns: bool,
}

impl Template {
    /// Attribute keys must be unique.
    pub fn new(attributes: Vec<Attribute>) -> SpecResult<Self> {
        let template = Self {
            attributes,
            ignore_unspecified_columns: false,
            report_ignored_columns: false,
        };
        template.check_keys()?;
        Ok(template)
    }

    pub fn from_json(json: &str) -> SpecResult<Self> {
        let template: Template = serde_json::from_str(json)?;
        template.check_keys()?;
        Ok(template)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> SpecResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Tolerate columns no attribute declares.
    pub fn ignore_unspecified_columns(mut self, ignore: bool) -> Self {
        self.ignore_unspecified_columns = ignore;
        self
    }

    /// Warn about tolerated unspecified columns.
    pub fn report_ignored_columns(mut self, report: bool) -> Self {
        self.report_ignored_columns = report;
        self
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    fn check_keys(&self) -> SpecResult<()> {
        let mut keys = HashSet::new();
        for attribute in &self.attributes {
            if !keys.insert(attribute.key.as_str()) {
                return Err(SpecError::DuplicatedKey(attribute.key.clone()));
            }
        }
        Ok(())
    }

    /// Compiles the template into a fresh specification.
    pub fn apply(&self, config: &TemplateConfig) -> SpecResult<Specification> {
        self.check_keys()?;

        let mut specification =
            Specification::new(self.ignore_unspecified_columns, self.report_ignored_columns);
        for attribute in &self.attributes {
            for column in attribute.columns(config)? {
                specification.insert(column)?;
            }
        }

        debug!(
            attributes = self.attributes.len(),
            columns = specification.len(),
            "template compiled"
        );
        Ok(specification)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::HeaderPattern;
    use crate::error::TypeError;

    fn sample() -> Template {
        Template::from_json(
            r#"{
                "attributes": [
                    { "key": "foo", "type": "string!" },
                    { "key": "bar", "type": ["string", "scalar", "email", "scalar", "scalar!"] },
                    {
                        "key": "baz",
                        "type": { "composite": "array_compact", "scalars": ["boolsy"] }
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_parse_document() {
        let template = sample();
        assert_eq!(template.attributes().len(), 3);
        assert_eq!(template.attributes()[0].ty, TypeDecl::scalar("string!"));
        assert_eq!(
            template.attributes()[2].ty,
            TypeDecl::composite("array_compact", &["boolsy"])
        );
    }

    #[test]
    fn test_apply() {
        let spec = sample().apply(&TemplateConfig::default()).unwrap();
        assert_eq!(spec.len(), 7);

        let headers: Vec<_> = spec.columns().map(|c| c.header().to_string()).collect();
        assert_eq!(
            headers,
            vec!["Foo", "Bar 1", "Bar 2", "Bar 3", "Bar 4", "Bar 5", "Baz 1"]
        );

        let required: Vec<_> =
            spec.required_columns().map(|(_, c)| c.header().to_string()).collect();
        assert_eq!(required, vec!["Foo", "Bar 5"]);

        let bar3 = spec.get(Some("BAR 3")).unwrap();
        assert_eq!(bar3.key(), "bar");
        assert_eq!(bar3.index(), Some(2));
        assert!(bar3.ty().is_composite());

        let bar1 = spec.get(Some("bar 1")).unwrap();
        assert!(Arc::ptr_eq(bar1.ty(), bar3.ty()));
    }

    #[test]
    fn test_duplicated_key() {
        let err = Template::new(vec![
            Attribute::new("foo", TypeDecl::scalar("string")),
            Attribute::new("foo", TypeDecl::scalar("email")),
        ])
        .unwrap_err();
        assert!(matches!(err, SpecError::DuplicatedKey(key) if key == "foo"));
    }

    #[test]
    fn test_unknown_types() {
        let template =
            Template::new(vec![Attribute::new("foo", TypeDecl::scalar("nope!"))]).unwrap();
        let err = template.apply(&TemplateConfig::default()).unwrap_err();
        assert!(matches!(err, SpecError::Type(TypeError::UnknownScalar(name)) if name == "nope"));

        let template =
            Template::new(vec![Attribute::new("foo", TypeDecl::composite("set", &["string"]))])
                .unwrap();
        let err = template.apply(&TemplateConfig::default()).unwrap_err();
        assert!(matches!(err, SpecError::Type(TypeError::UnknownComposite(_))));
    }

    #[test]
    fn test_colliding_headers() {
        let config = TemplateConfig::default()
            .with_header_naming(|_, _| Ok(("Same".to_string(), HeaderPattern::literal("Same"))));
        let template = Template::new(vec![
            Attribute::new("foo", TypeDecl::scalar("string")),
            Attribute::new("bar", TypeDecl::scalar("string")),
        ])
        .unwrap();

        let err = template.apply(&config).unwrap_err();
        assert!(matches!(err, SpecError::DuplicatedPattern(_)));
    }

    #[test]
    fn test_flags() {
        let spec = sample()
            .ignore_unspecified_columns(true)
            .report_ignored_columns(true)
            .apply(&TemplateConfig::default())
            .unwrap();
        assert!(spec.ignore_unspecified_columns());
        assert!(spec.report_ignored_columns());
    }

    #[test]
    fn test_invalid_document() {
        assert!(matches!(Template::from_json("{"), Err(SpecError::Json(_))));
        assert!(matches!(
            Template::from_path("/nonexistent/template.json"),
            Err(SpecError::Io(_))
        ));
    }
}
