//! Cell string garbage removal.

use once_cell::sync::Lazy;
use regex::Regex;

// Whitespace or anything non-printable (control, format, unassigned, private use).
static GARBAGE_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\A[\s\p{C}]+").expect("Invalid garbage prefix regex"));
static GARBAGE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\p{C}]+\z").expect("Invalid garbage suffix regex"));

/// Strips leading and trailing whitespace and non-printable characters.
///
/// Inner garbage is kept untouched.
pub fn clean_cell_string(value: &str) -> String {
    let value = GARBAGE_PREFIX.replace(value, "");
    GARBAGE_SUFFIX.replace(&value, "").into_owned()
}
