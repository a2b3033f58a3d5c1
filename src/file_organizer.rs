//! File placement: copying or moving a single file into a destination folder.
//!
//! This module also owns the error type shared by every organizing operation.
//! Placement never overwrites: if the destination folder already holds a file
//! with the same name, the placement is reported as skipped and nothing on
//! disk changes.

use crate::config::ConfigError;
use crate::output::OutputFormatter;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Whether a placement keeps or removes the original file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceMode {
    /// Duplicate the file; the original stays where it is.
    Copy,
    /// Relocate the file; the original is removed.
    Move,
}

impl PlaceMode {
    fn verb(self) -> &'static str {
        match self {
            PlaceMode::Copy => "copy",
            PlaceMode::Move => "move",
        }
    }
}

/// Outcome of a single placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The file was copied to the contained path.
    Copied(PathBuf),
    /// The file was moved to the contained path.
    Moved(PathBuf),
    /// A file with the same name already existed at the contained path.
    Skipped(PathBuf),
}

impl Placement {
    /// The path the file occupies (or would have occupied) in the destination.
    pub fn destination(&self) -> &Path {
        match self {
            Placement::Copied(path) | Placement::Moved(path) | Placement::Skipped(path) => path,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Placement::Skipped(_))
    }

    /// Prints the progress line for this placement.
    pub fn announce(&self) {
        let dest = self.destination();
        let name = dest
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        let folder = dest.parent().unwrap_or(dest).display();

        match self {
            Placement::Copied(_) => {
                OutputFormatter::success(&format!("Copied {} to {}", name, folder))
            }
            Placement::Moved(_) => {
                OutputFormatter::success(&format!("Moved {} to {}", name, folder))
            }
            Placement::Skipped(_) => {
                OutputFormatter::warning(&format!("{} already exists in {}, skipping", name, folder))
            }
        }
    }
}

/// Errors that can occur while organizing files.
#[derive(Debug)]
pub enum OrganizeError {
    /// A directory to enumerate does not exist.
    DirectoryNotFound { path: PathBuf },
    /// Listing a directory failed.
    ReadDirFailed { path: PathBuf, source: io::Error },
    /// Failed to create an organizing folder.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// No leading word could be extracted from a filename.
    NoFilenameMatch { file: PathBuf },
    /// Copying or moving a file failed.
    PlacementFailed {
        source: PathBuf,
        destination: PathBuf,
        mode: PlaceMode,
        source_error: io::Error,
    },
    /// Configuration could not be loaded or is invalid.
    Config(ConfigError),
}

impl std::fmt::Display for OrganizeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DirectoryNotFound { path } => {
                write!(f, "Directory '{}' does not exist", path.display())
            }
            Self::ReadDirFailed { path, source } => {
                write!(f, "Failed to read directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::NoFilenameMatch { file } => {
                write!(
                    f,
                    "No leading word found in file name {}",
                    file.display()
                )
            }
            Self::PlacementFailed {
                source,
                destination,
                mode,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to {} {} to {}: {}",
                    mode.verb(),
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::Config(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for OrganizeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadDirFailed { source, .. } | Self::DirectoryCreationFailed { source, .. } => {
                Some(source)
            }
            Self::PlacementFailed { source_error, .. } => Some(source_error),
            Self::Config(e) => Some(e),
            Self::DirectoryNotFound { .. } | Self::NoFilenameMatch { .. } => None,
        }
    }
}

impl From<ConfigError> for OrganizeError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

/// Result type for organizing operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Creates `path` (and missing parents) unless it already exists.
pub fn ensure_dir(path: &Path) -> OrganizeResult<()> {
    fs::create_dir_all(path).map_err(|e| OrganizeError::DirectoryCreationFailed {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Copies or moves single files into destination folders.
pub struct FilePlacer;

impl FilePlacer {
    /// Places `file_path` into `dest_dir`, keeping its file name.
    ///
    /// If `dest_dir` already contains an entry with that name, nothing is
    /// touched and `Placement::Skipped` is returned. The destination folder
    /// must already exist.
    ///
    /// The operation is not atomic. A move that has to fall back to
    /// copy-then-delete (across devices) can be interrupted between the two
    /// steps, leaving the file in both places.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stl_organizer::file_organizer::{FilePlacer, PlaceMode};
    /// use std::path::Path;
    ///
    /// let placement = FilePlacer::place(
    ///     Path::new("stl/CoreBracket.stl"),
    ///     Path::new("stl/stl_organized/core"),
    ///     PlaceMode::Copy,
    /// );
    /// match placement {
    ///     Ok(p) => p.announce(),
    ///     Err(e) => eprintln!("{}", e),
    /// }
    /// ```
    pub fn place(file_path: &Path, dest_dir: &Path, mode: PlaceMode) -> OrganizeResult<Placement> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| OrganizeError::PlacementFailed {
                source: file_path.to_path_buf(),
                destination: dest_dir.to_path_buf(),
                mode,
                source_error: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let destination = dest_dir.join(file_name);
        // Any entry counts, including a dangling symlink
        if fs::symlink_metadata(&destination).is_ok() {
            return Ok(Placement::Skipped(destination));
        }

        let result = match mode {
            PlaceMode::Copy => fs::copy(file_path, &destination).map(|_| ()),
            PlaceMode::Move => Self::move_file(file_path, &destination),
        };

        result.map_err(|e| OrganizeError::PlacementFailed {
            source: file_path.to_path_buf(),
            destination: destination.clone(),
            mode,
            source_error: e,
        })?;

        Ok(match mode {
            PlaceMode::Copy => Placement::Copied(destination),
            PlaceMode::Move => Placement::Moved(destination),
        })
    }

    fn move_file(from: &Path, to: &Path) -> io::Result<()> {
        match fs::rename(from, to) {
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                fs::copy(from, to)?;
                fs::remove_file(from)
            }
            other => other,
        }
    }
}
