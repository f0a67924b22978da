//! Spreadsheet column letters.
//!
//! Columns are numbered from 1: `A` is 1, `Z` is 26, `AA` is 27.

const CHARSET_SIZE: usize = 26;

/// Converts a column label to its 1-based number.
///
/// Returns `None` for empty labels and labels with anything but `A`-`Z`.
pub fn col2int(col: &str) -> Option<usize> {
    if col.is_empty() {
        return None;
    }

    col.bytes().try_fold(0usize, |acc, byte| {
        if !byte.is_ascii_uppercase() {
            return None;
        }
        let digit = (byte - b'A') as usize + 1;
        acc.checked_mul(CHARSET_SIZE)?.checked_add(digit)
    })
}

/// Converts a 1-based column number to its label. `None` for zero.
pub fn int2col(int: usize) -> Option<String> {
    if int == 0 {
        return None;
    }

    let mut x = int;
    let mut col = Vec::new();

    while x > 0 {
        let mut q = x / CHARSET_SIZE;
        let mut r = x % CHARSET_SIZE;
        if r == 0 {
            q -= 1;
            r = CHARSET_SIZE;
        }
        x = q;
        col.push(b'A' + (r - 1) as u8);
    }

    col.reverse();
    String::from_utf8(col).ok()
}

/// Label of the column at a 0-based position.
pub fn col_label(index: usize) -> String {
    int2col(index + 1).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_col2int() {
        assert_eq!(col2int("A"), Some(1));
        assert_eq!(col2int("Z"), Some(26));
        assert_eq!(col2int("AA"), Some(27));
        assert_eq!(col2int("AZ"), Some(52));
        assert_eq!(col2int("BA"), Some(53));
        assert_eq!(col2int("ZZ"), Some(702));
        assert_eq!(col2int("AAA"), Some(703));
    }

    #[test]
    fn test_int2col() {
        assert_eq!(int2col(1).as_deref(), Some("A"));
        assert_eq!(int2col(26).as_deref(), Some("Z"));
        assert_eq!(int2col(27).as_deref(), Some("AA"));
        assert_eq!(int2col(702).as_deref(), Some("ZZ"));
        assert_eq!(int2col(703).as_deref(), Some("AAA"));
        assert_eq!(col_label(1), "B");
    }

    #[test]
    fn test_invalid_input() {
        assert_eq!(col2int(""), None);
        assert_eq!(col2int("a"), None);
        assert_eq!(col2int("A1"), None);
        assert_eq!(int2col(0), None);
    }
}
