//! Lazy enumeration of the top-level files in a directory.

use crate::config::CompiledFilters;
use crate::file_organizer::{OrganizeError, OrganizeResult};
use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

/// Iterator over the regular files directly inside one directory whose
/// names end with a given extension.
///
/// Produced by [`iterate_files`]. Entries are yielded in the order the
/// filesystem lists them. Subdirectories are never entered, and entries
/// that cannot be inspected are skipped.
pub struct FileIter<'a> {
    entries: ReadDir,
    extension: String,
    filters: Option<&'a CompiledFilters>,
}

/// Starts enumerating `dir` for files ending in `extension` (empty matches
/// every file).
///
/// The directory is checked up front, so a missing directory is reported
/// before anything is yielded.
///
/// # Errors
///
/// `OrganizeError::DirectoryNotFound` if `dir` does not exist,
/// `OrganizeError::ReadDirFailed` if it cannot be listed.
///
/// # Examples
///
/// ```no_run
/// use stl_organizer::file_iter::iterate_files;
/// use std::path::Path;
///
/// for path in iterate_files(Path::new("stl"), ".stl")? {
///     println!("{}", path.display());
/// }
/// # Ok::<(), stl_organizer::file_organizer::OrganizeError>(())
/// ```
pub fn iterate_files<'a>(dir: &Path, extension: &str) -> OrganizeResult<FileIter<'a>> {
    if !dir.is_dir() {
        return Err(OrganizeError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }

    let entries = fs::read_dir(dir).map_err(|e| OrganizeError::ReadDirFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    Ok(FileIter {
        entries,
        extension: extension.to_string(),
        filters: None,
    })
}

impl<'a> FileIter<'a> {
    /// Additionally drops files rejected by `filters`.
    pub fn with_filters(mut self, filters: &'a CompiledFilters) -> Self {
        self.filters = Some(filters);
        self
    }

    fn accepts(&self, file_name: &str) -> bool {
        file_name.ends_with(&self.extension)
            && self
                .filters
                .is_none_or(|filters| filters.should_include(file_name))
    }
}

impl Iterator for FileIter<'_> {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        while let Some(entry) = self.entries.next() {
            let Ok(entry) = entry else { continue };
            let path = entry.path();
            // Follows symlinks, like a plain "is this a file" check would
            let is_file = fs::metadata(&path).map(|m| m.is_file()).unwrap_or(false);
            if !is_file {
                continue;
            }

            let file_name = entry.file_name();
            if self.accepts(&file_name.to_string_lossy()) {
                return Some(path);
            }
        }
        None
    }
}
