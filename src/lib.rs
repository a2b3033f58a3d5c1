//! stl-organizer - sort a flat directory of files into keyword folders
//!
//! Files are first copied into category folders chosen by keywords found in
//! their names. Files that match no keyword land in `other`, which is then
//! split by moving each file into a folder named after the leading word of
//! its name.

pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_iter;
pub mod file_organizer;
pub mod filename_word;
pub mod organize;
pub mod output;

pub use config::{ConfigError, NoWordPolicy, OrganizerConfig, Settings};
pub use file_category::{Bin, CategoryMatcher, match_words};
pub use file_iter::{FileIter, iterate_files};
pub use file_organizer::{FilePlacer, OrganizeError, OrganizeResult, PlaceMode, Placement};
pub use filename_word::leading_word;
pub use organize::{CategoryReport, Organizer, PassReport, RunReport};

pub use cli::{Cli, run_cli};
