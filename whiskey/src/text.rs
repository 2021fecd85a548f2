//! Text-related utility functions.

use caseless::default_case_fold_str;
use unicode_normalization::UnicodeNormalization;

/// Normalize user input for comparisons.
///
/// Surrounding whitespace is removed, the text is brought into NFKC form and
/// case folded. Two inputs that a user would consider "the same word" should
/// normalize to the same string.
pub fn normalize(text: &str) -> String {
    let text = text.trim().nfkc().collect::<String>();
    default_case_fold_str(&text).nfkc().collect()
}

/// Compare two strings after [`normalize`]-ing both.
pub fn same(a: &str, b: &str) -> bool {
    normalize(a) == normalize(b)
}
