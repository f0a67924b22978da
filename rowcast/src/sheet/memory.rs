use super::{header_text, col_label, Rows, Sheet, SheetHeader, SheetRow};
use crate::error::BackendResult;
use crate::value::Value;

/// In-memory table backend. The first row holds the headers.
#[derive(Debug, Clone, Default)]
pub struct MemorySheet {
    headers: Vec<Value>,
    rows: Vec<Vec<Value>>,
}

impl MemorySheet {
    pub fn new(table: Vec<Vec<Value>>) -> Self {
        let mut table = table.into_iter();
        let headers = table.next().unwrap_or_default();
        Self {
            headers,
            rows: table.collect(),
        }
    }

    /// Builds a table from anything convertible to values.
    pub fn from_rows<R, V>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self::new(
            rows.into_iter()
                .map(|row| row.into_iter().map(Into::into).collect())
                .collect(),
        )
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }
}

impl Sheet for MemorySheet {
    fn headers(&mut self) -> BackendResult<Vec<SheetHeader>> {
        Ok(self
            .headers
            .iter()
            .enumerate()
            .map(|(index, value)| SheetHeader::new(col_label(index), header_text(value)))
            .collect())
    }

    fn rows(&mut self) -> Rows<'_> {
        let width = self.width();
        Box::new(
            self.rows
                .iter()
                .enumerate()
                .map(move |(index, raw)| {
                    Ok(SheetRow::from_values(index + 1, raw.iter().cloned(), width))
                }),
        )
    }
}
