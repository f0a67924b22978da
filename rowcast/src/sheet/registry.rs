//! Backend selection.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use super::{CsvOptions, CsvSheet, MemorySheet, Sheet};
use crate::error::{BackendResult, SheetError};
use crate::value::Value;

/// Where a document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetSource {
    /// In-memory table, first row holds the headers.
    Table(Vec<Vec<Value>>),
    /// File on disk.
    Path(PathBuf),
    /// Raw document bytes.
    Bytes(Vec<u8>),
}

impl SheetSource {
    fn extension(&self) -> Option<String> {
        match self {
            SheetSource::Path(path) => path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_lowercase),
            _ => None,
        }
    }
}

/// A document reader that can recognize its sources.
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    fn matches(&self, source: &SheetSource) -> bool;

    fn open(&self, source: SheetSource) -> BackendResult<Box<dyn Sheet>>;
}

/// Reads [`SheetSource::Table`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct MemoryBackend;

impl Backend for MemoryBackend {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn matches(&self, source: &SheetSource) -> bool {
        matches!(source, SheetSource::Table(_))
    }

    fn open(&self, source: SheetSource) -> BackendResult<Box<dyn Sheet>> {
        match source {
            SheetSource::Table(table) => Ok(Box::new(MemorySheet::new(table))),
            _ => Err(SheetError::MissingTable),
        }
    }
}

/// Reads `.csv`, `.tsv` and `.txt` files and raw bytes.
#[derive(Debug, Clone, Default)]
pub struct CsvBackend {
    pub options: CsvOptions,
}

const CSV_EXTENSIONS: [&str; 3] = ["csv", "tsv", "txt"];

impl Backend for CsvBackend {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn matches(&self, source: &SheetSource) -> bool {
        match source {
            SheetSource::Bytes(_) => true,
            SheetSource::Path(_) => source
                .extension()
                .is_some_and(|ext| CSV_EXTENSIONS.contains(&ext.as_str())),
            SheetSource::Table(_) => false,
        }
    }

    fn open(&self, source: SheetSource) -> BackendResult<Box<dyn Sheet>> {
        let sheet = match source {
            SheetSource::Path(path) => CsvSheet::open(path, &self.options)?,
            SheetSource::Bytes(bytes) => CsvSheet::from_bytes(&bytes, &self.options)?,
            SheetSource::Table(_) => return Err(SheetError::MissingTable),
        };
        Ok(Box::new(sheet))
    }
}

/// Ordered list of backends; the first one matching a source opens it.
#[derive(Clone)]
pub struct BackendRegistry {
    backends: Vec<Arc<dyn Backend>>,
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::with_csv_options(CsvOptions::default())
    }
}

impl BackendRegistry {
    /// A registry without any backend.
    pub fn empty() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// The built-in backends, CSV reading configured with `options`.
    pub fn with_csv_options(options: CsvOptions) -> Self {
        Self::empty()
            .register(MemoryBackend)
            .register(CsvBackend { options })
    }

    /// Adds a backend. Backends registered under an existing name replace it
    /// in place.
    pub fn register<B: Backend + 'static>(mut self, backend: B) -> Self {
        let backend: Arc<dyn Backend> = Arc::new(backend);
        match self.backends.iter().position(|b| b.name() == backend.name()) {
            Some(position) => self.backends[position] = backend,
            None => self.backends.push(backend),
        }
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.backends.iter().map(|b| b.name()).collect()
    }

    pub fn get(&self, source: &SheetSource) -> Option<Arc<dyn Backend>> {
        self.backends.iter().find(|b| b.matches(source)).cloned()
    }
}

impl fmt::Debug for BackendRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendRegistry").field("backends", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selection() {
        let registry = BackendRegistry::default();

        let table = SheetSource::Table(vec![vec![Value::from("foo")]]);
        assert_eq!(registry.get(&table).map(|b| b.name()), Some("memory"));

        for path in ["a.csv", "a.TSV", "dir/a.txt"] {
            let source = SheetSource::Path(path.into());
            assert_eq!(registry.get(&source).map(|b| b.name()), Some("csv"));
        }

        let bytes = SheetSource::Bytes(b"a,b".to_vec());
        assert_eq!(registry.get(&bytes).map(|b| b.name()), Some("csv"));
    }

    #[test]
    fn test_no_applicable_backend() {
        let registry = BackendRegistry::default();
        assert!(registry.get(&SheetSource::Path("a.xlsx".into())).is_none());
        assert!(registry.get(&SheetSource::Path("noext".into())).is_none());
        assert!(BackendRegistry::empty().get(&SheetSource::Bytes(Vec::new())).is_none());
    }

    #[test]
    fn test_register_replaces_by_name() {
        let registry = BackendRegistry::default().register(CsvBackend {
            options: CsvOptions {
                delimiter: Some(';'),
                encoding: None,
            },
        });
        assert_eq!(registry.names(), vec!["memory", "csv"]);
    }

    #[test]
    fn test_open_table() {
        let backend = MemoryBackend;
        let mut sheet = backend
            .open(SheetSource::Table(vec![vec![Value::from("foo")], vec![Value::from("x")]]))
            .unwrap();
        assert_eq!(sheet.headers().unwrap().len(), 1);
        assert_eq!(sheet.rows().count(), 1);
    }
}
