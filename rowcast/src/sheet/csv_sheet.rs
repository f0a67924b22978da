//! CSV backend with encoding and delimiter auto-detection.

use std::io::Cursor;
use std::path::Path;

use csv::{Reader, ReaderBuilder, StringRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{col_label, Rows, Sheet, SheetHeader, SheetRow};
use crate::error::{BackendResult, SheetError};
use crate::value::Value;

/// CSV reading options. Unset values are detected from the document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvOptions {
    #[serde(default)]
    pub delimiter: Option<char>,
    #[serde(default)]
    pub encoding: Option<String>,
}

/// CSV document backend.
///
/// The document is decoded once when opened; records are then parsed one at
/// a time. Empty fields are read as null.
///
/// The whole decoded document stays in memory until the sheet is dropped.
/// Only parsed rows are streamed, so memory still grows with the input size.
pub struct CsvSheet {
    reader: Reader<Cursor<Vec<u8>>>,
    headers: Vec<String>,
    encoding: String,
    delimiter: char,
    closed: bool,
}

impl CsvSheet {
    /// Reads and decodes the whole file up front. The file is not touched
    /// again after this returns.
    pub fn open<P: AsRef<Path>>(path: P, options: &CsvOptions) -> BackendResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| SheetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes, options)
    }

    pub fn from_bytes(bytes: &[u8], options: &CsvOptions) -> BackendResult<Self> {
        let encoding = match &options.encoding {
            Some(encoding) => encoding.clone(),
            None => detect_encoding(bytes),
        };
        let content = decode_content(bytes, &encoding)?;
        Self::from_str_with(content, encoding, options.delimiter)
    }

    pub fn from_text(content: &str, options: &CsvOptions) -> BackendResult<Self> {
        Self::from_str_with(content.to_string(), "utf-8".to_string(), options.delimiter)
    }

    fn from_str_with(
        content: String,
        encoding: String,
        delimiter: Option<char>,
    ) -> BackendResult<Self> {
        let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(&content));
        let delimiter_byte = u8::try_from(delimiter)
            .map_err(|_| SheetError::Encoding(format!("non-ASCII delimiter {:?}", delimiter)))?;

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(delimiter_byte)
            .from_reader(Cursor::new(content.into_bytes()));

        let mut record = StringRecord::new();
        let headers = if reader.read_record(&mut record)? {
            record.iter().map(str::to_string).collect()
        } else {
            Vec::new()
        };

        debug!(
            encoding = %encoding,
            delimiter = %delimiter.escape_default(),
            columns = headers.len(),
            "opened CSV document"
        );

        Ok(Self {
            reader,
            headers,
            encoding,
            delimiter,
            closed: false,
        })
    }

    pub fn encoding(&self) -> &str {
        &self.encoding
    }

    pub fn delimiter(&self) -> char {
        self.delimiter
    }
}

impl Sheet for CsvSheet {
    fn headers(&mut self) -> BackendResult<Vec<SheetHeader>> {
        Ok(self
            .headers
            .iter()
            .enumerate()
            .map(|(index, value)| {
                let value = (!value.is_empty()).then(|| value.clone());
                SheetHeader::new(col_label(index), value)
            })
            .collect())
    }

    fn rows(&mut self) -> Rows<'_> {
        let width = self.headers.len();
        if self.closed {
            return Box::new(std::iter::empty());
        }

        Box::new(self.reader.records().enumerate().map(move |(index, record)| {
            let record = record?;
            let values = record.iter().map(|field| {
                if field.is_empty() {
                    Value::Null
                } else {
                    Value::from(field)
                }
            });
            Ok(SheetRow::from_values(index + 1, values, width))
        }))
    }

    fn close(&mut self) -> BackendResult<()> {
        self.closed = true;
        Ok(())
    }
}

// =============================================================================
// Detection
// =============================================================================

/// Guesses the encoding label of a document, normalized to the labels
/// [`decode_content`] knows. Empty or pure ASCII input is UTF-8.
pub fn detect_encoding(bytes: &[u8]) -> String {
    let charset = chardet::detect(bytes).0;

    match charset.to_lowercase().as_str() {
        "" | "ascii" | "utf-8" | "utf8" => "utf-8".to_string(),
        "iso-8859-1" | "iso-8859-15" | "latin-1" | "latin1" => "iso-8859-1".to_string(),
        "windows-1252" | "cp1252" => "windows-1252".to_string(),
        _ => charset,
    }
}

/// Decodes a document. Invalid UTF-8 is replaced rather than rejected;
/// unknown labels are a [`SheetError::Encoding`].
pub fn decode_content(bytes: &[u8], encoding: &str) -> BackendResult<String> {
    let label = encoding.to_lowercase();
    let codec = match label.as_str() {
        "utf-8" | "utf8" | "ascii" => {
            return Ok(String::from_utf8(bytes.to_vec())
                .unwrap_or_else(|_| String::from_utf8_lossy(bytes).into_owned()));
        }
        "iso-8859-1" | "latin-1" | "latin1" => encoding_rs::ISO_8859_15,
        "windows-1252" | "cp1252" => encoding_rs::WINDOWS_1252,
        other => encoding_rs::Encoding::for_label(other.as_bytes())
            .ok_or_else(|| SheetError::Encoding(encoding.to_string()))?,
    };

    let (content, _, _) = codec.decode(bytes);
    Ok(content.into_owned())
}

/// Most frequent separator of the header line, `,` when none occurs.
pub fn detect_delimiter(content: &str) -> char {
    let first_line = content.lines().next().unwrap_or("");

    let separators = [';', ',', '\t', '|'];
    let mut best_sep = ',';
    let mut best_count = 0;

    for &sep in &separators {
        let count = first_line.matches(sep).count();
        if count > best_count {
            best_count = count;
            best_sep = sep;
        }
    }

    best_sep
}
