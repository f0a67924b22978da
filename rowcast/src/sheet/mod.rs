//! Document backends.
//!
//! A backend turns a document into one header row and a sequence of data
//! rows. Every row is padded or truncated to the header width, so cells line
//! up with header positions. Rows are numbered from 1 (first data row) and
//! columns are labelled with spreadsheet letters.
//!
//! - [`MemorySheet`] - in-memory table, first row holds the headers
//! - [`CsvSheet`] - CSV document with encoding and delimiter detection
//! - [`BackendRegistry`] - picks a backend for a [`SheetSource`]

pub mod col;
mod csv_sheet;
mod memory;
mod registry;

use crate::error::BackendResult;
use crate::value::Value;

pub use csv_sheet::{CsvOptions, CsvSheet};
pub use col::{col2int, col_label, int2col};
pub use memory::MemorySheet;
pub use registry::{Backend, BackendRegistry, CsvBackend, MemoryBackend, SheetSource};

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetHeader {
    pub col: String,
    pub value: Option<String>,
}

impl SheetHeader {
    pub fn new(col: impl Into<String>, value: Option<String>) -> Self {
        Self {
            col: col.into(),
            value,
        }
    }

    /// Position of this header's cells within a [`SheetRow`].
    pub fn row_value_index(&self) -> Option<usize> {
        col2int(&self.col).map(|int| int - 1)
    }
}

/// One data cell.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetCell {
    pub row: usize,
    pub col: String,
    pub value: Value,
}

/// One data row.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow {
    pub row: usize,
    pub cells: Vec<SheetCell>,
}

impl SheetRow {
    /// Builds a row from raw values, aligned to `width` columns.
    pub fn from_values(row: usize, values: impl IntoIterator<Item = Value>, width: usize) -> Self {
        let mut values = values.into_iter();
        let cells = (0..width)
            .map(|index| SheetCell {
                row,
                col: col_label(index),
                value: values.next().unwrap_or_default(),
            })
            .collect();
        Self { row, cells }
    }
}

/// Boxed row iterator returned by [`Sheet::rows`].
pub type Rows<'a> = Box<dyn Iterator<Item = BackendResult<SheetRow>> + 'a>;

/// A readable document.
pub trait Sheet {
    /// Header cells, in column order.
    fn headers(&mut self) -> BackendResult<Vec<SheetHeader>>;

    /// Data rows, in document order.
    fn rows(&mut self) -> Rows<'_>;

    /// Releases underlying resources. Idempotent.
    fn close(&mut self) -> BackendResult<()> {
        Ok(())
    }
}

/// Header text of a raw header cell.
pub(crate) fn header_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
