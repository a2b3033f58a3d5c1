//! Leading-word extraction for the fallback grouping.
//!
//! The pattern accepts either a letter followed by lowercase letters at the
//! very start of the name (`Widget` in `Widget_holder`), or the first run of
//! ASCII letters that ends on a word boundary anywhere in the name (`part` in
//! `01_part`). Names without any such run yield `None`.

use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;

static LEADING_WORD: OnceLock<Regex> = OnceLock::new();

fn leading_word_pattern() -> &'static Regex {
    LEADING_WORD.get_or_init(|| {
        Regex::new(r"^[A-Za-z][a-z]+|[A-Za-z]+\b").expect("leading word pattern is valid")
    })
}

/// Returns the grouping word of `name`.
///
/// ```
/// use stl_organizer::filename_word::leading_word;
///
/// assert_eq!(leading_word("Widget_holder"), Some("Widget"));
/// assert_eq!(leading_word("42"), None);
/// ```
pub fn leading_word(name: &str) -> Option<&str> {
    leading_word_pattern().find(name).map(|m| m.as_str())
}

/// Returns the grouping word of a file, looking only at its stem so the
/// extension is never used as a folder name.
pub fn file_leading_word(file_path: &Path) -> Option<String> {
    let stem = file_path.file_stem()?.to_string_lossy();
    leading_word(&stem).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capitalized_prefix() {
        assert_eq!(leading_word("Widget_holder"), Some("Widget"));
        assert_eq!(leading_word("WidgetHolder"), Some("Widget"));
    }

    #[test]
    fn test_lowercase_prefix() {
        assert_eq!(leading_word("widget_holder"), Some("widget"));
    }

    #[test]
    fn test_all_caps_run_at_boundary() {
        assert_eq!(leading_word("ABC"), Some("ABC"));
        assert_eq!(leading_word("ABC-part"), Some("ABC"));
    }

    #[test]
    fn test_leading_digits_fall_through_to_later_word() {
        assert_eq!(leading_word("01-bracket"), Some("bracket"));
        assert_eq!(leading_word("3d_print"), Some("print"));
    }

    #[test]
    fn test_no_word() {
        assert_eq!(leading_word(""), None);
        assert_eq!(leading_word("12345"), None);
        assert_eq!(leading_word("__--"), None);
    }

    #[test]
    fn test_file_leading_word_ignores_extension() {
        assert_eq!(
            file_leading_word(Path::new("/tmp/other/Widget_holder.stl")),
            Some("Widget".to_string())
        );
        assert_eq!(file_leading_word(Path::new("/tmp/other/42.stl")), None);
    }
}
