//! Column descriptors and header patterns.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::error::{SpecError, SpecResult, TypeError, TypeResult};
use crate::types::Type;

/// How an actual header is matched against a column.
#[derive(Debug, Clone)]
pub enum HeaderPattern {
    /// Exact text match.
    Literal(String),
    /// Regex match.
    Matcher(Regex),
}

impl HeaderPattern {
    pub fn literal(text: impl Into<String>) -> Self {
        HeaderPattern::Literal(text.into())
    }

    /// Compiles a regex pattern.
    pub fn regex(source: &str) -> SpecResult<Self> {
        Regex::new(source)
            .map(HeaderPattern::Matcher)
            .map_err(|e| SpecError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })
    }

    /// Anchored, case-insensitive match of `text`.
    pub fn ignore_case(text: &str) -> SpecResult<Self> {
        Self::regex(&format!("(?i)^{}$", regex::escape(text)))
    }

    pub fn matches(&self, header: &str) -> bool {
        match self {
            HeaderPattern::Literal(text) => text == header,
            HeaderPattern::Matcher(regex) => regex.is_match(header),
        }
    }

    /// Pattern source, as used for duplicate detection.
    pub fn source(&self) -> &str {
        match self {
            HeaderPattern::Literal(text) => text,
            HeaderPattern::Matcher(regex) => regex.as_str(),
        }
    }
}

impl PartialEq for HeaderPattern {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HeaderPattern::Literal(a), HeaderPattern::Literal(b)) => a == b,
            (HeaderPattern::Matcher(a), HeaderPattern::Matcher(b)) => a.as_str() == b.as_str(),
            _ => false,
        }
    }
}

impl Eq for HeaderPattern {}

impl fmt::Display for HeaderPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeaderPattern::Literal(text) => write!(f, "{:?}", text),
            HeaderPattern::Matcher(regex) => write!(f, "/{}/", regex.as_str()),
        }
    }
}

/// One concrete cell slot of a specification.
///
/// Columns of the same composite attribute share their key and their type.
#[derive(Debug, Clone)]
pub struct Column {
    key: String,
    ty: Arc<Type>,
    index: Option<usize>,
    header: String,
    header_pattern: HeaderPattern,
    required: bool,
}

impl Column {
    /// Builds a column, checking that `index` fits `ty`: scalars take no
    /// index, composites need one within their slots.
    ///
    /// Without an explicit pattern, the header text is matched literally.
    pub fn new(
        key: impl Into<String>,
        ty: Arc<Type>,
        index: Option<usize>,
        header: impl Into<String>,
        header_pattern: Option<HeaderPattern>,
        required: bool,
    ) -> TypeResult<Self> {
        match (ty.as_ref(), index) {
            (Type::Scalar(_), Some(index)) => return Err(TypeError::ScalarIndexed(index)),
            (Type::Composite(composite), index)
                if index.map_or(true, |i| i >= composite.slots()) =>
            {
                return Err(TypeError::InvalidIndex {
                    index,
                    slots: composite.slots(),
                })
            }
            _ => {}
        }

        let header = header.into();
        let header_pattern =
            header_pattern.unwrap_or_else(|| HeaderPattern::literal(header.clone()));

        Ok(Self {
            key: key.into(),
            ty,
            index,
            header,
            header_pattern,
            required,
        })
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn ty(&self) -> &Arc<Type> {
        &self.ty
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn header_pattern(&self) -> &HeaderPattern {
        &self.header_pattern
    }

    pub fn is_required(&self) -> bool {
        self.required
    }
}
