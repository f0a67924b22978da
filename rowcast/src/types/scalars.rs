//! Built-in scalar casts and scalar types.
//!
//! Every scalar type starts with a [`ScalarCast`] (null gate and string
//! cleaning), then appends its own casts:
//!
//! | Type | Chain |
//! |------|-------|
//! | `scalar` | `ScalarCast` |
//! | `string` | `ScalarCast`, `StringCast` |
//! | `email` | `ScalarCast`, `StringCast`, `EmailCast` |
//! | `boolsy` | `ScalarCast`, `BoolsyCast` |
//! | `date_string` | `ScalarCast`, `DateStringCast` |

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::json;

use super::cast::{Cast, Step};
use super::ScalarType;
use crate::messaging::{MessageCode, Messenger};
use crate::utils::clean_cell_string;
use crate::value::Value;

/// Default date format of [`DateStringCast`].
pub const DATE_FORMAT: &str = "%Y-%m-%d";

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"\A[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+",
        r"@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?",
        r"(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\z",
    ))
    .expect("Invalid email regex")
});

// =============================================================================
// ScalarCast
// =============================================================================

/// Null gate and string cleaning, first cast of every scalar type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarCast {
    /// Null passes through as a null success. Otherwise it fails with
    /// `must_exist`.
    pub nullable: bool,
    /// Strip garbage around strings, warning with `cleaned_string` when
    /// anything was removed.
    pub clean_string: bool,
}

impl Default for ScalarCast {
    fn default() -> Self {
        Self {
            nullable: true,
            clean_string: true,
        }
    }
}

impl ScalarCast {
    pub fn required() -> Self {
        Self {
            nullable: false,
            ..Self::default()
        }
    }
}

impl Cast for ScalarCast {
    fn call(&self, value: Value, messenger: &mut Messenger) -> Step {
        match value {
            Value::Null if self.nullable => Step::Success(None),
            Value::Null => Step::fail(MessageCode::MustExist, None),
            Value::String(s) if self.clean_string => {
                let cleaned = clean_cell_string(&s);
                if cleaned != s {
                    messenger.warn(MessageCode::CleanedString, None);
                }
                Step::Continue(Value::String(cleaned))
            }
            other => Step::Continue(other),
        }
    }
}

// =============================================================================
// StringCast
// =============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StringCast;

impl Cast for StringCast {
    fn call(&self, value: Value, _messenger: &mut Messenger) -> Step {
        match value {
            Value::String(_) => Step::Continue(value),
            _ => Step::fail(MessageCode::MustBeString, None),
        }
    }
}

// =============================================================================
// EmailCast
// =============================================================================

/// Checks strings against an email matcher.
#[derive(Debug, Clone)]
pub struct EmailCast {
    pub matcher: Regex,
}

impl Default for EmailCast {
    fn default() -> Self {
        Self {
            matcher: EMAIL_REGEX.clone(),
        }
    }
}

impl Cast for EmailCast {
    fn call(&self, value: Value, _messenger: &mut Messenger) -> Step {
        match value.as_str() {
            Some(s) if self.matcher.is_match(s) => Step::Continue(value),
            _ => Step::fail(
                MessageCode::MustBeEmail,
                Some(json!({ "value": value.inspect() })),
            ),
        }
    }
}

// =============================================================================
// BoolsyCast
// =============================================================================

/// Maps values onto booleans.
///
/// Values found in `truthy` become `true`, values found in `falsy` become
/// `false`. Unless `strict`, the conventional `true`/`false`, `1`/`0`,
/// `"true"`/`"false"` and `"1"`/`"0"` are recognized too.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolsyCast {
    pub truthy: Vec<Value>,
    pub falsy: Vec<Value>,
    pub strict: bool,
}

impl BoolsyCast {
    pub fn new(truthy: Vec<Value>, falsy: Vec<Value>) -> Self {
        Self {
            truthy,
            falsy,
            strict: false,
        }
    }

    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    fn conventional(value: &Value) -> Option<bool> {
        match value {
            Value::Bool(b) => Some(*b),
            Value::Int(1) => Some(true),
            Value::Int(0) => Some(false),
            Value::String(s) if s == "true" || s == "1" => Some(true),
            Value::String(s) if s == "false" || s == "0" => Some(false),
            _ => None,
        }
    }
}

impl Cast for BoolsyCast {
    fn call(&self, value: Value, _messenger: &mut Messenger) -> Step {
        let matched = if self.truthy.contains(&value) {
            Some(true)
        } else if self.falsy.contains(&value) {
            Some(false)
        } else if !self.strict {
            Self::conventional(&value)
        } else {
            None
        };

        match matched {
            Some(b) => Step::Continue(Value::Bool(b)),
            None => Step::fail(
                MessageCode::MustBeBoolsy,
                Some(json!({ "value": value.inspect() })),
            ),
        }
    }
}

// =============================================================================
// DateStringCast
// =============================================================================

/// Parses strings as dates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateStringCast {
    /// `chrono` format string.
    pub format: String,
    /// Let native date values through.
    pub accept_date: bool,
}

impl Default for DateStringCast {
    fn default() -> Self {
        Self {
            format: DATE_FORMAT.to_string(),
            accept_date: true,
        }
    }
}

impl DateStringCast {
    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::default()
        }
    }
}

impl Cast for DateStringCast {
    fn call(&self, value: Value, _messenger: &mut Messenger) -> Step {
        let date = match &value {
            Value::Date(date) if self.accept_date => Some(*date),
            Value::String(s) => NaiveDate::parse_from_str(s, &self.format).ok(),
            _ => None,
        };

        match date {
            Some(date) => Step::Continue(Value::Date(date)),
            None => Step::fail(
                MessageCode::MustBeDate,
                Some(json!({ "format": self.format })),
            ),
        }
    }
}

// =============================================================================
// Scalar types
// =============================================================================

pub fn scalar() -> ScalarType {
    ScalarType::base(ScalarCast::default())
}

pub fn string() -> ScalarType {
    scalar().cast(StringCast)
}

pub fn email() -> ScalarType {
    string().cast(EmailCast::default())
}

pub fn boolsy() -> ScalarType {
    scalar().cast(BoolsyCast::default())
}

pub fn date_string() -> ScalarType {
    scalar().cast(DateStringCast::default())
}
