//! Organizer configuration.
//!
//! Settings are read from a TOML file and merged with command-line flags by
//! the CLI. Every field has a default, so an empty file (or no file at all)
//! reproduces the stock behavior: `.stl` files under `stl/`, sorted into
//! `core`, `cover` and `logo`.
//!
//! # Configuration File Format
//!
//! ```toml
//! target_dir = "stl"
//! extension = ".stl"
//! categories = ["core", "cover", "logo"]
//!
//! [fallback]
//! enabled = true
//! on_no_word = "skip"   # skip | catch_all | fail
//! catch_all_dir = "misc"
//!
//! [filters]
//! enable_hidden_files = true
//!
//! [filters.exclude]
//! filenames = ["Thumbs.db"]
//! patterns = ["*_draft.stl"]
//! regex = []
//!
//! [filters.include]
//! patterns = []
//! ```

use crate::file_category::{CategoryMatcher, OTHER_DIR_NAME};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".stl-organizer.toml";

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Configuration file not found at the specified path.
    ConfigNotFound(PathBuf),
    /// Invalid TOML syntax or structure.
    ConfigInvalid(String),
    /// Invalid glob pattern provided.
    InvalidGlobPattern(String),
    /// Invalid regex pattern provided with the actual error reason.
    InvalidRegexPattern {
        /// The regex pattern that failed to compile.
        pattern: String,
        /// The reason why the pattern is invalid.
        reason: String,
    },
    /// A category keyword cannot be used as a folder name.
    InvalidCategory(String),
    /// A configured folder name is not a single path component.
    InvalidFolderName(String),
    /// IO error while reading configuration.
    IoError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ConfigNotFound(path) => {
                write!(f, "Configuration file not found: {}", path.display())
            }
            ConfigError::ConfigInvalid(msg) => write!(f, "Invalid configuration: {}", msg),
            ConfigError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            ConfigError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
            ConfigError::InvalidCategory(category) => {
                write!(
                    f,
                    "Invalid category '{}': categories must be non-empty folder names other than '{}'",
                    category,
                    OTHER_DIR_NAME
                )
            }
            ConfigError::InvalidFolderName(name) => {
                write!(f, "Invalid folder name '{}'", name)
            }
            ConfigError::IoError(msg) => write!(f, "IO error reading configuration: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Top-level configuration as read from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizerConfig {
    /// Source directory, relative to the working directory. Defaults to `stl`.
    pub target_dir: PathBuf,
    /// Filename suffix to organize; empty matches every file. Defaults to `.stl`.
    pub extension: String,
    /// Ordered category keywords. Defaults to `core`, `cover`, `logo`.
    pub categories: Vec<String>,
    pub fallback: FallbackConfig,
    pub filters: FilterRules,
}

impl Default for OrganizerConfig {
    fn default() -> Self {
        Self {
            target_dir: PathBuf::from("stl"),
            extension: ".stl".to_string(),
            categories: vec!["core".to_string(), "cover".to_string(), "logo".to_string()],
            fallback: FallbackConfig::default(),
            filters: FilterRules::default(),
        }
    }
}

/// Settings for the leading-word pass over `other`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackConfig {
    /// Whether the pass runs at all. Defaults to true.
    pub enabled: bool,
    /// What to do with a file whose name has no leading word.
    pub on_no_word: NoWordPolicy,
    /// Folder used by [`NoWordPolicy::CatchAll`]. Defaults to `misc`.
    pub catch_all_dir: String,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            on_no_word: NoWordPolicy::Skip,
            catch_all_dir: "misc".to_string(),
        }
    }
}

/// Handling of files whose name yields no leading word (e.g. `42.stl`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoWordPolicy {
    /// Leave the file where it is and print a warning.
    #[default]
    Skip,
    /// Move the file into the catch-all folder.
    CatchAll,
    /// Abort the pass with an error.
    Fail,
}

/// File filtering rules applied on top of the extension filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterRules {
    /// Whether to include hidden files (starting with "."). Defaults to true.
    #[serde(default = "default_enable_hidden_files")]
    pub enable_hidden_files: bool,

    /// Rules for excluding files.
    #[serde(default)]
    pub exclude: ExcludeRules,

    /// Rules for including files (whitelist, overrides exclude rules).
    #[serde(default)]
    pub include: IncludeRules,
}

fn default_enable_hidden_files() -> bool {
    true
}

impl Default for FilterRules {
    fn default() -> Self {
        Self {
            enable_hidden_files: default_enable_hidden_files(),
            exclude: ExcludeRules::default(),
            include: IncludeRules::default(),
        }
    }
}

/// Rules for excluding files from organization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExcludeRules {
    /// Exact filenames to exclude (e.g., "Thumbs.db").
    #[serde(default)]
    pub filenames: Vec<String>,

    /// Glob patterns matched against the file name (e.g., "*_draft.stl").
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns matched against the file name.
    #[serde(default)]
    pub regex: Vec<String>,
}

/// Rules for including files, overriding exclude rules (whitelist).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IncludeRules {
    /// Glob patterns that override exclude rules.
    #[serde(default)]
    pub patterns: Vec<String>,
}

impl OrganizerConfig {
    /// Load configuration from a file, with fallback to defaults.
    ///
    /// Attempts to load configuration in the following order:
    /// 1. If `config_path` is provided, load from that file
    /// 2. Look for `.stl-organizer.toml` in the current directory
    /// 3. Look for `~/.config/stl-organizer/config.toml` in home directory
    /// 4. Fall back to default configuration
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is explicitly provided but cannot be read,
    /// or if any discovered file is not valid TOML.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        let local_config = PathBuf::from(LOCAL_CONFIG_FILE);
        if local_config.exists() {
            return Self::load_from_file(&local_config);
        }

        if let Ok(home) = std::env::var("HOME") {
            let home_config = PathBuf::from(home)
                .join(".config")
                .join("stl-organizer")
                .join("config.toml");
            if home_config.exists() {
                return Self::load_from_file(&home_config);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConfigNotFound` if file does not exist.
    /// Returns `ConfigError::ConfigInvalid` if TOML parsing fails.
    /// Returns `ConfigError::IoError` if file cannot be read.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::ConfigNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::ConfigInvalid(e.to_string()))
    }

    /// Validate the configuration and compile it into [`Settings`].
    ///
    /// Categories are lowercased and de-duplicated, keeping the first
    /// occurrence so that list order still decides match priority.
    ///
    /// # Errors
    ///
    /// Returns an error for categories or folder names that are not a single
    /// path component, and for invalid glob or regex patterns.
    pub fn compile(self) -> Result<Settings, ConfigError> {
        let categories = normalize_categories(&self.categories)?;
        if !is_folder_name(&self.fallback.catch_all_dir) {
            return Err(ConfigError::InvalidFolderName(self.fallback.catch_all_dir));
        }

        let matcher = CategoryMatcher::new(&categories)
            .map_err(|e| ConfigError::ConfigInvalid(format!("category pattern: {}", e)))?;

        Ok(Settings {
            extension: self.extension,
            matcher,
            fallback: self.fallback,
            filters: CompiledFilters::new(self.filters)?,
        })
    }
}

fn normalize_categories(raw: &[String]) -> Result<Vec<String>, ConfigError> {
    let mut seen = HashSet::new();
    let mut categories = Vec::with_capacity(raw.len());
    for category in raw {
        let lower = category.trim().to_lowercase();
        if !is_folder_name(&lower) || lower == OTHER_DIR_NAME {
            return Err(ConfigError::InvalidCategory(category.clone()));
        }
        if seen.insert(lower.clone()) {
            categories.push(lower);
        }
    }
    Ok(categories)
}

/// A usable folder name is exactly one normal path component.
fn is_folder_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\'])
        && Path::new(name).components().count() == 1
}

/// Validated, ready-to-use settings consumed by the organizer.
#[derive(Debug)]
pub struct Settings {
    /// Filename suffix to organize; empty matches every file.
    pub extension: String,
    /// Compiled category keywords.
    pub matcher: CategoryMatcher,
    /// Leading-word pass settings.
    pub fallback: FallbackConfig,
    /// Compiled exclusion rules.
    pub filters: CompiledFilters,
}

impl Settings {
    /// Default settings with the given categories, for callers that do not
    /// read a configuration file.
    pub fn with_categories<S: AsRef<str>>(extension: &str, categories: &[S]) -> Result<Self, ConfigError> {
        OrganizerConfig {
            extension: extension.to_string(),
            categories: categories.iter().map(|c| c.as_ref().to_string()).collect(),
            ..OrganizerConfig::default()
        }
        .compile()
    }
}

/// Compiled filter structures for matching file names.
#[derive(Debug)]
pub struct CompiledFilters {
    enable_hidden_files: bool,
    exclude_filenames: HashSet<String>,
    exclude_patterns: Vec<Pattern>,
    exclude_regexes: Vec<Regex>,
    include_patterns: Vec<Pattern>,
}

impl CompiledFilters {
    /// Create compiled filters from filter rules.
    ///
    /// # Errors
    ///
    /// Returns an error if any glob or regex patterns are invalid.
    pub fn new(rules: FilterRules) -> Result<Self, ConfigError> {
        let compile_globs = |patterns: &[String]| {
            patterns
                .iter()
                .map(|pattern| {
                    Pattern::new(pattern)
                        .map_err(|_| ConfigError::InvalidGlobPattern(pattern.clone()))
                })
                .collect::<Result<Vec<_>, _>>()
        };

        let exclude_regexes = rules
            .exclude
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| ConfigError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            enable_hidden_files: rules.enable_hidden_files,
            exclude_filenames: rules.exclude.filenames.into_iter().collect(),
            exclude_patterns: compile_globs(&rules.exclude.patterns)?,
            exclude_regexes,
            include_patterns: compile_globs(&rules.include.patterns)?,
        })
    }

    /// Check if a file name passes the filters.
    ///
    /// Checks are performed in this order, with early termination:
    /// 1. Include patterns (whitelist) - if matched, always include
    /// 2. Hidden file filter - if hidden and disabled, exclude
    /// 3. Exact filename match - if matched, exclude
    /// 4. Glob pattern match - if matched, exclude
    /// 5. Regex pattern match - if matched, exclude
    /// 6. Default: include
    pub fn should_include(&self, file_name: &str) -> bool {
        if self.include_patterns.iter().any(|p| p.matches(file_name)) {
            return true;
        }

        if !self.enable_hidden_files && file_name.starts_with('.') {
            return false;
        }

        if self.exclude_filenames.contains(file_name) {
            return false;
        }

        if self.exclude_patterns.iter().any(|p| p.matches(file_name)) {
            return false;
        }

        !self.exclude_regexes.iter().any(|r| r.is_match(file_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = OrganizerConfig::default();
        assert_eq!(config.target_dir, PathBuf::from("stl"));
        assert_eq!(config.extension, ".stl");
        assert_eq!(config.categories, vec!["core", "cover", "logo"]);
        assert!(config.fallback.enabled);
        assert_eq!(config.fallback.on_no_word, NoWordPolicy::Skip);
    }

    #[test]
    fn test_empty_toml_is_default() {
        let config = OrganizerConfig::from_toml("").unwrap();
        assert_eq!(config.categories, OrganizerConfig::default().categories);
        assert_eq!(config.extension, ".stl");
    }

    #[test]
    fn test_parse_full_toml() {
        let config = OrganizerConfig::from_toml(
            r#"
            target_dir = "models"
            extension = ".3mf"
            categories = ["base", "lid"]

            [fallback]
            enabled = false
            on_no_word = "catch_all"
            catch_all_dir = "unsorted"

            [filters]
            enable_hidden_files = false

            [filters.exclude]
            filenames = ["Thumbs.db"]
            patterns = ["*_draft.3mf"]
            "#,
        )
        .unwrap();

        assert_eq!(config.target_dir, PathBuf::from("models"));
        assert_eq!(config.extension, ".3mf");
        assert_eq!(config.categories, vec!["base", "lid"]);
        assert!(!config.fallback.enabled);
        assert_eq!(config.fallback.on_no_word, NoWordPolicy::CatchAll);
        assert_eq!(config.fallback.catch_all_dir, "unsorted");
        assert!(!config.filters.enable_hidden_files);
        assert_eq!(config.filters.exclude.patterns, vec!["*_draft.3mf"]);
    }

    #[test]
    fn test_invalid_policy_is_rejected() {
        let result = OrganizerConfig::from_toml("[fallback]\non_no_word = \"explode\"");
        assert!(matches!(result, Err(ConfigError::ConfigInvalid(_))));
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let result = OrganizerConfig::load(Some(Path::new("/non/existent/config.toml")));
        assert!(matches!(result, Err(ConfigError::ConfigNotFound(_))));
    }

    #[test]
    fn test_categories_are_normalized() {
        let categories = normalize_categories(&[
            "Core".to_string(),
            "logo".to_string(),
            "CORE".to_string(),
        ])
        .unwrap();
        assert_eq!(categories, vec!["core", "logo"]);
    }

    #[test]
    fn test_invalid_categories_are_rejected() {
        for bad in ["", "  ", "a/b", "..", ".", "other", " Other "] {
            let result = normalize_categories(&[bad.to_string()]);
            assert!(
                matches!(result, Err(ConfigError::InvalidCategory(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_invalid_catch_all_dir_is_rejected() {
        let mut config = OrganizerConfig::default();
        config.fallback.catch_all_dir = "../escape".to_string();
        assert!(matches!(
            config.compile(),
            Err(ConfigError::InvalidFolderName(_))
        ));
    }

    #[test]
    fn test_hidden_file_included_by_default() {
        let compiled = CompiledFilters::new(FilterRules::default()).unwrap();
        assert!(compiled.should_include(".core_part.stl"));
        assert!(compiled.should_include("core.stl"));

        let config = OrganizerConfig::from_toml("[filters.exclude]\nfilenames = [\"x\"]").unwrap();
        assert!(config.filters.enable_hidden_files);
    }

    #[test]
    fn test_hidden_file_excluded_when_disabled() {
        let config = OrganizerConfig::from_toml("[filters]\nenable_hidden_files = false").unwrap();
        let compiled = CompiledFilters::new(config.filters).unwrap();
        assert!(!compiled.should_include(".DS_Store"));
        assert!(compiled.should_include("core.stl"));
    }

    #[test]
    fn test_exclude_rules() {
        let compiled = CompiledFilters::new(FilterRules {
            enable_hidden_files: true,
            exclude: ExcludeRules {
                filenames: vec!["Thumbs.db".to_string()],
                patterns: vec!["*_draft.stl".to_string()],
                regex: vec![r"^tmp\d+".to_string()],
            },
            include: IncludeRules::default(),
        })
        .unwrap();

        assert!(!compiled.should_include("Thumbs.db"));
        assert!(!compiled.should_include("logo_draft.stl"));
        assert!(!compiled.should_include("tmp42.stl"));
        assert!(compiled.should_include("logo_final.stl"));
        assert!(compiled.should_include(".hidden.stl"));
    }

    #[test]
    fn test_include_overrides_exclude() {
        let compiled = CompiledFilters::new(FilterRules {
            enable_hidden_files: false,
            exclude: ExcludeRules {
                patterns: vec!["*_draft.stl".to_string()],
                ..Default::default()
            },
            include: IncludeRules {
                patterns: vec!["core_draft.stl".to_string(), ".keep*".to_string()],
            },
        })
        .unwrap();

        assert!(compiled.should_include("core_draft.stl"));
        assert!(compiled.should_include(".keep.stl"));
        assert!(!compiled.should_include("logo_draft.stl"));
    }

    #[test]
    fn test_invalid_patterns_return_error() {
        let bad_glob = FilterRules {
            exclude: ExcludeRules {
                patterns: vec!["[invalid".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            CompiledFilters::new(bad_glob),
            Err(ConfigError::InvalidGlobPattern(_))
        ));

        let bad_regex = FilterRules {
            exclude: ExcludeRules {
                regex: vec!["[invalid(".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(matches!(
            CompiledFilters::new(bad_regex),
            Err(ConfigError::InvalidRegexPattern { .. })
        ));
    }

    #[test]
    fn test_settings_with_categories() {
        let settings = Settings::with_categories(".stl", &["Base", "lid"]).unwrap();
        assert_eq!(settings.extension, ".stl");
        assert_eq!(settings.matcher.categories(), ["base", "lid"]);
    }
}
