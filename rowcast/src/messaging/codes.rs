use std::fmt;

use serde::{Serialize, Serializer};

/// Stable message identifiers, suitable as i18n lookup keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MessageCode {
    InvalidHeader,
    DuplicatedHeader,
    MissingColumn,
    IgnoredColumn,
    MustExist,
    MustBeString,
    MustBeArray,
    MustBeBoolsy,
    MustBeEmail,
    MustBeDate,
    CleanedString,
    NoApplicableBackend,
    SheetError,
    /// Code emitted by a user-defined cast. Never validated.
    Custom(String),
}

impl MessageCode {
    /// Every built-in code, in documentation order.
    pub const BUILTIN: [MessageCode; 13] = [
        MessageCode::InvalidHeader,
        MessageCode::DuplicatedHeader,
        MessageCode::MissingColumn,
        MessageCode::IgnoredColumn,
        MessageCode::MustExist,
        MessageCode::MustBeString,
        MessageCode::MustBeArray,
        MessageCode::MustBeBoolsy,
        MessageCode::MustBeEmail,
        MessageCode::MustBeDate,
        MessageCode::CleanedString,
        MessageCode::NoApplicableBackend,
        MessageCode::SheetError,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            MessageCode::InvalidHeader => "invalid_header",
            MessageCode::DuplicatedHeader => "duplicated_header",
            MessageCode::MissingColumn => "missing_column",
            MessageCode::IgnoredColumn => "ignored_column",
            MessageCode::MustExist => "must_exist",
            MessageCode::MustBeString => "must_be_string",
            MessageCode::MustBeArray => "must_be_array",
            MessageCode::MustBeBoolsy => "must_be_boolsy",
            MessageCode::MustBeEmail => "must_be_email",
            MessageCode::MustBeDate => "must_be_date",
            MessageCode::CleanedString => "cleaned_string",
            MessageCode::NoApplicableBackend => "no_applicable_backend",
            MessageCode::SheetError => "sheet_error",
            MessageCode::Custom(code) => code,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, MessageCode::Custom(_))
    }
}

impl fmt::Display for MessageCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&str> for MessageCode {
    fn from(code: &str) -> Self {
        MessageCode::BUILTIN
            .into_iter()
            .find(|builtin| builtin.as_str() == code)
            .unwrap_or_else(|| MessageCode::Custom(code.to_string()))
    }
}

impl From<String> for MessageCode {
    fn from(code: String) -> Self {
        MessageCode::from(code.as_str())
    }
}

impl Serialize for MessageCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
