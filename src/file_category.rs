//! Keyword categories matched against file names.
//!
//! All keywords are compiled into one case-insensitive alternation. The regex
//! engine reports the leftmost match, and among alternatives that start at the
//! same position the one listed first wins. That is the only priority rule.
//!
//! # Examples
//!
//! ```
//! use stl_organizer::file_category::{Bin, CategoryMatcher};
//!
//! let matcher = CategoryMatcher::new(&["core", "cover", "logo"]).unwrap();
//! assert_eq!(matcher.match_category("CoreBracket_v2.stl"), Some("core".to_string()));
//! assert_eq!(matcher.categorize("Widget_holder.stl"), Bin::Other);
//! ```

use regex::{Regex, RegexBuilder};

/// Name of the folder receiving files that match no category.
pub const OTHER_DIR_NAME: &str = "other";

/// Destination of a file in the category pass.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Bin {
    /// The file name contains this (lowercase) keyword.
    Category(String),
    /// No keyword matched.
    Other,
}

impl Bin {
    /// Returns the folder name for this bin.
    ///
    /// ```
    /// use stl_organizer::file_category::Bin;
    ///
    /// assert_eq!(Bin::Category("logo".to_string()).dir_name(), "logo");
    /// assert_eq!(Bin::Other.dir_name(), "other");
    /// ```
    pub fn dir_name(&self) -> &str {
        match self {
            Bin::Category(keyword) => keyword,
            Bin::Other => OTHER_DIR_NAME,
        }
    }
}

/// Compiled set of category keywords.
#[derive(Debug, Clone)]
pub struct CategoryMatcher {
    categories: Vec<String>,
    pattern: Option<Regex>,
}

impl CategoryMatcher {
    /// Compiles the keywords into a single alternation.
    ///
    /// Keywords are lowercased and matched literally. Empty keywords are
    /// dropped; with no keywords left the matcher never matches.
    ///
    /// # Errors
    ///
    /// Fails only if the combined pattern exceeds the regex size limit.
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, regex::Error> {
        let categories: Vec<String> = keywords
            .iter()
            .map(|k| k.as_ref().to_lowercase())
            .filter(|k| !k.is_empty())
            .collect();

        let pattern = if categories.is_empty() {
            None
        } else {
            // One capture group per keyword, so the winner maps back to its index
            let alternation = categories
                .iter()
                .map(|k| format!("({})", regex::escape(k)))
                .collect::<Vec<_>>()
                .join("|");
            Some(
                RegexBuilder::new(&alternation)
                    .case_insensitive(true)
                    .build()?,
            )
        };

        Ok(Self {
            categories,
            pattern,
        })
    }

    /// The lowercase keywords in priority order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns the keyword found earliest in `text`, if any.
    pub fn match_category(&self, text: &str) -> Option<String> {
        let captures = self.pattern.as_ref()?.captures(text)?;
        captures
            .iter()
            .skip(1)
            .position(|group| group.is_some())
            .map(|index| self.categories[index].clone())
    }

    /// Maps a file name to its destination bin.
    pub fn categorize(&self, file_name: &str) -> Bin {
        self.match_category(file_name)
            .map_or(Bin::Other, Bin::Category)
    }
}

/// Matches `words` against `text` without keeping the compiled matcher.
///
/// ```
/// use stl_organizer::file_category::match_words;
///
/// assert_eq!(match_words("big_LOGO_plate", &["core", "logo"]), Some("logo".to_string()));
/// assert_eq!(match_words("plate", &["core", "logo"]), None);
/// ```
pub fn match_words<S: AsRef<str>>(text: &str, words: &[S]) -> Option<String> {
    CategoryMatcher::new(words).ok()?.match_category(text)
}
