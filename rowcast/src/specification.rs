//! Header pattern registry.

use std::sync::Arc;

use crate::column::{Column, HeaderPattern};
use crate::error::{SpecError, SpecResult};

/// Ordered mapping of header patterns to columns.
///
/// Built once (usually by [`Template::apply`](crate::Template::apply)), then
/// shared read-only by every row of every sheet processed against it.
#[derive(Debug, Clone, Default)]
pub struct Specification {
    columns: Vec<(HeaderPattern, Arc<Column>)>,
    ignore_unspecified_columns: bool,
    report_ignored_columns: bool,
}

impl Specification {
    pub fn new(ignore_unspecified_columns: bool, report_ignored_columns: bool) -> Self {
        Self {
            columns: Vec::new(),
            ignore_unspecified_columns,
            report_ignored_columns,
        }
    }

    /// Registers `column` under `pattern`. Patterns must be unique.
    pub fn set(&mut self, pattern: HeaderPattern, column: Column) -> SpecResult<()> {
        if self.columns.iter().any(|(existing, _)| *existing == pattern) {
            return Err(SpecError::DuplicatedPattern(pattern.to_string()));
        }
        self.columns.push((pattern, Arc::new(column)));
        Ok(())
    }

    /// Registers `column` under its own header pattern.
    pub fn insert(&mut self, column: Column) -> SpecResult<()> {
        self.set(column.header_pattern().clone(), column)
    }

    /// First column whose pattern matches `header`, in registration order.
    pub fn get(&self, header: Option<&str>) -> Option<&Arc<Column>> {
        self.resolve(header).map(|(_, column)| column)
    }

    /// Like [`get`](Self::get), also returning the column's registration
    /// position, which identifies it within this specification.
    pub fn resolve(&self, header: Option<&str>) -> Option<(usize, &Arc<Column>)> {
        let header = header?;
        self.columns
            .iter()
            .enumerate()
            .find(|(_, (pattern, _))| pattern.matches(header))
            .map(|(position, (_, column))| (position, column))
    }

    pub fn columns(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.columns.iter().map(|(_, column)| column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Required columns with their registration position.
    pub fn required_columns(&self) -> impl Iterator<Item = (usize, &Arc<Column>)> {
        self.columns()
            .enumerate()
            .filter(|(_, column)| column.is_required())
    }

    pub fn optional_columns(&self) -> impl Iterator<Item = &Arc<Column>> {
        self.columns().filter(|column| !column.is_required())
    }

    pub fn ignore_unspecified_columns(&self) -> bool {
        self.ignore_unspecified_columns
    }

    pub fn report_ignored_columns(&self) -> bool {
        self.report_ignored_columns
    }
}
