use std::fmt;
use std::sync::Arc;

use crate::column::HeaderPattern;
use crate::error::SpecResult;
use crate::types::TypeContainer;

type HeaderNaming =
    Arc<dyn Fn(&str, Option<usize>) -> SpecResult<(String, HeaderPattern)> + Send + Sync>;

/// Compilation settings of a [`Template`](super::Template): the type
/// registry and the header naming rule.
#[derive(Clone)]
pub struct TemplateConfig {
    pub types: TypeContainer,
    naming: HeaderNaming,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self::new(TypeContainer::default())
    }
}

impl TemplateConfig {
    pub fn new(types: TypeContainer) -> Self {
        Self {
            types,
            naming: Arc::new(default_header),
        }
    }

    /// Replaces the header naming rule.
    pub fn with_header_naming<F>(mut self, naming: F) -> Self
    where
        F: Fn(&str, Option<usize>) -> SpecResult<(String, HeaderPattern)> + Send + Sync + 'static,
    {
        self.naming = Arc::new(naming);
        self
    }

    /// Canonical header text and matching pattern of an attribute column.
    pub fn header(&self, key: &str, index: Option<usize>) -> SpecResult<(String, HeaderPattern)> {
        (self.naming)(key, index)
    }
}

impl fmt::Debug for TemplateConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateConfig").field("types", &self.types).finish_non_exhaustive()
    }
}

/// `key` capitalized, composite slots suffixed with their 1-based position,
/// matched case-insensitively.
pub fn default_header(key: &str, index: Option<usize>) -> SpecResult<(String, HeaderPattern)> {
    let mut header = capitalize(key);
    if let Some(index) = index {
        header = format!("{} {}", header, index + 1);
    }
    let pattern = HeaderPattern::ignore_case(&header)?;
    Ok((header, pattern))
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
