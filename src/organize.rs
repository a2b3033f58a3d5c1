//! The two organizing passes.
//!
//! The category pass copies every file of the source directory into
//! `<source>/<source>_organized/<category>` or `.../other`. The fallback pass
//! then moves each file in `other` into a folder named after the leading word
//! of its name. Originals survive the first pass; the second pass only ever
//! moves the copies.

use crate::config::{NoWordPolicy, OrganizerConfig, Settings};
use crate::file_category::OTHER_DIR_NAME;
use crate::file_iter::iterate_files;
use crate::file_organizer::{
    FilePlacer, OrganizeError, OrganizeResult, PlaceMode, Placement, ensure_dir,
};
use crate::filename_word::file_leading_word;
use crate::output::{OutputFormatter, Progress};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// What one pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PassReport {
    /// Files placed, keyed by destination folder name.
    pub placed: BTreeMap<String, usize>,
    /// Destination paths that already existed and were left alone.
    pub skipped: Vec<PathBuf>,
    /// Files left in place because no leading word was found.
    pub unmatched: Vec<PathBuf>,
    /// Files that could not be copied or moved, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

impl PassReport {
    /// Number of files copied or moved.
    pub fn total_placed(&self) -> usize {
        self.placed.values().sum()
    }

    /// Number of files placed into `folder`.
    pub fn placed_in(&self, folder: &str) -> usize {
        self.placed.get(folder).copied().unwrap_or(0)
    }

    fn record(&mut self, folder: &str, file_path: &Path, outcome: OrganizeResult<Placement>) {
        match outcome {
            Ok(placement) => {
                placement.announce();
                match placement {
                    Placement::Skipped(dest) => self.skipped.push(dest),
                    Placement::Copied(_) | Placement::Moved(_) => {
                        *self.placed.entry(folder.to_string()).or_insert(0) += 1;
                    }
                }
            }
            Err(e) => {
                OutputFormatter::error(&e.to_string());
                self.failed.push((file_path.to_path_buf(), e.to_string()));
            }
        }
    }
}

/// Result of the category pass.
#[derive(Debug, Clone)]
pub struct CategoryReport {
    /// `<source>/<source>_organized`.
    pub organized_dir: PathBuf,
    /// The `other` folder inside the organized directory.
    pub other_dir: PathBuf,
    pub report: PassReport,
}

/// Result of a full run.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub category: CategoryReport,
    /// `None` when the fallback pass is disabled.
    pub fallback: Option<PassReport>,
}

impl RunReport {
    /// Files that failed to be placed in either pass.
    pub fn failures(&self) -> usize {
        self.category.report.failed.len()
            + self.fallback.as_ref().map_or(0, |r| r.failed.len())
    }
}

/// Returns `<source>/<name of source>_organized`.
pub fn organized_dir_for(source: &Path) -> PathBuf {
    let name = source
        .file_name()
        .map(|n| n.to_os_string())
        .or_else(|| {
            // "." and friends: name the folder after the resolved directory
            fs::canonicalize(source)
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_os_string()))
        })
        .unwrap_or_else(|| "root".into());

    let mut folder = name;
    folder.push("_organized");
    source.join(folder)
}

/// Runs the organizing passes with one set of [`Settings`].
pub struct Organizer {
    settings: Settings,
    show_progress: bool,
}

impl Organizer {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            show_progress: false,
        }
    }

    /// Validates `config` and builds an organizer from it.
    pub fn from_config(config: OrganizerConfig) -> OrganizeResult<Self> {
        Ok(Self::new(config.compile()?))
    }

    /// Shows a spinner while each pass runs.
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn progress(&self, label: &str) -> Progress {
        if self.show_progress {
            Progress::spinner(label)
        } else {
            Progress::hidden()
        }
    }

    /// Runs the category pass over `source`, then the fallback pass over the
    /// resulting `other` folder unless the fallback is disabled.
    ///
    /// # Errors
    ///
    /// Propagates the fatal errors of either pass. Per-file failures are
    /// collected in the reports instead.
    pub fn run(&self, source: &Path) -> OrganizeResult<RunReport> {
        let category = self.organize_via_category(source)?;

        let fallback = if self.settings.fallback.enabled {
            Some(self.organize_via_filename(&category.other_dir)?)
        } else {
            None
        };

        Ok(RunReport { category, fallback })
    }

    /// Copies every matching file of `source` into its category folder.
    ///
    /// The organized directory, one folder per category and `other` are
    /// created first if missing. Files whose name contains no category
    /// keyword are copied into `other`. Originals are never touched, and a
    /// file already present in its destination is skipped, so re-running is
    /// safe.
    ///
    /// # Errors
    ///
    /// `DirectoryNotFound` if `source` does not exist, checked before any
    /// folder is created. Folder creation failures are also fatal.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use stl_organizer::config::Settings;
    /// use stl_organizer::organize::Organizer;
    /// use std::path::Path;
    ///
    /// let settings = Settings::with_categories(".stl", &["core", "cover", "logo"]).unwrap();
    /// let report = Organizer::new(settings)
    ///     .organize_via_category(Path::new("stl"))
    ///     .unwrap();
    /// println!("organized into {}", report.organized_dir.display());
    /// ```
    pub fn organize_via_category(&self, source: &Path) -> OrganizeResult<CategoryReport> {
        let files = iterate_files(source, &self.settings.extension)?
            .with_filters(&self.settings.filters);

        let organized_dir = organized_dir_for(source);
        ensure_dir(&organized_dir)?;
        for category in self.settings.matcher.categories() {
            ensure_dir(&organized_dir.join(category))?;
            OutputFormatter::info(&format!("Category folder ready: {}", category));
        }
        let other_dir = organized_dir.join(OTHER_DIR_NAME);
        ensure_dir(&other_dir)?;
        OutputFormatter::info(&format!("Category folder ready: {}", OTHER_DIR_NAME));

        let progress = self.progress("Categorizing");
        let mut report = PassReport::default();

        for file_path in files {
            let file_name = display_name(&file_path);
            progress.tick(&file_name);

            let bin = self.settings.matcher.categorize(&file_name);
            let folder = bin.dir_name();
            let outcome = FilePlacer::place(&file_path, &organized_dir.join(folder), PlaceMode::Copy);
            progress.suspend(|| report.record(folder, &file_path, outcome));
        }

        Ok(CategoryReport {
            organized_dir,
            other_dir,
            report,
        })
    }

    /// Moves every matching file of `dir` into `dir/<leading word>`.
    ///
    /// Meant for the `other` folder produced by
    /// [`organize_via_category`](Self::organize_via_category). Files whose
    /// name has no leading word are handled by the configured
    /// [`NoWordPolicy`].
    ///
    /// # Errors
    ///
    /// `DirectoryNotFound` if `dir` does not exist and `NoFilenameMatch` under
    /// [`NoWordPolicy::Fail`]. A group folder that cannot be created is
    /// recorded as a failure for that file only.
    pub fn organize_via_filename(&self, dir: &Path) -> OrganizeResult<PassReport> {
        let files = iterate_files(dir, &self.settings.extension)?
            .with_filters(&self.settings.filters);
        OutputFormatter::info(&format!("Grouping {} by leading word", dir.display()));

        let fallback = &self.settings.fallback;
        let progress = self.progress("Grouping");
        let mut report = PassReport::default();

        for file_path in files {
            progress.tick(&display_name(&file_path));

            let folder = match file_leading_word(&file_path) {
                Some(word) => word,
                None => match fallback.on_no_word {
                    NoWordPolicy::Skip => {
                        progress.suspend(|| {
                            OutputFormatter::warning(&format!(
                                "No leading word in {}, leaving it in place",
                                display_name(&file_path)
                            ))
                        });
                        report.unmatched.push(file_path);
                        continue;
                    }
                    NoWordPolicy::CatchAll => fallback.catch_all_dir.clone(),
                    NoWordPolicy::Fail => {
                        return Err(OrganizeError::NoFilenameMatch { file: file_path });
                    }
                },
            };

            let dest = dir.join(&folder);
            let outcome =
                ensure_dir(&dest).and_then(|()| FilePlacer::place(&file_path, &dest, PlaceMode::Move));
            progress.suspend(|| report.record(&folder, &file_path, outcome));
        }

        Ok(report)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filename_word::leading_word;
    use tempfile::TempDir;

    fn organizer(policy: NoWordPolicy) -> Organizer {
        let mut settings = Settings::with_categories(".stl", &["core", "cover", "logo"]).unwrap();
        settings.fallback.on_no_word = policy;
        Organizer::new(settings)
    }

    fn source_dir(temp_dir: &TempDir) -> PathBuf {
        let source = temp_dir.path().join("stl");
        fs::create_dir(&source).unwrap();
        source
    }

    #[test]
    fn test_organized_dir_for() {
        assert_eq!(
            organized_dir_for(Path::new("/models/stl")),
            PathBuf::from("/models/stl/stl_organized")
        );
    }

    #[test]
    fn test_category_pass_copies_into_bins() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_dir(&temp_dir);
        fs::write(source.join("CoreBracket_v2.stl"), "core").unwrap();
        fs::write(source.join("Widget_holder.stl"), "widget").unwrap();

        let result = organizer(NoWordPolicy::Skip)
            .organize_via_category(&source)
            .unwrap();

        let organized = source.join("stl_organized");
        assert_eq!(result.organized_dir, organized);
        assert_eq!(result.other_dir, organized.join("other"));
        assert!(organized.join("core").join("CoreBracket_v2.stl").is_file());
        assert!(organized.join("other").join("Widget_holder.stl").is_file());
        assert!(organized.join("cover").is_dir());
        assert!(organized.join("logo").is_dir());
        assert!(source.join("CoreBracket_v2.stl").is_file());
        assert!(source.join("Widget_holder.stl").is_file());
        assert_eq!(result.report.placed_in("core"), 1);
        assert_eq!(result.report.placed_in("other"), 1);
    }

    #[test]
    fn test_category_pass_rerun_skips_everything() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_dir(&temp_dir);
        fs::write(source.join("logo_plate.stl"), "").unwrap();
        fs::write(source.join("Gear.stl"), "").unwrap();

        let organizer = organizer(NoWordPolicy::Skip);
        organizer.organize_via_category(&source).unwrap();
        let second = organizer.organize_via_category(&source).unwrap();

        assert_eq!(second.report.total_placed(), 0);
        assert_eq!(second.report.skipped.len(), 2);
        assert!(second.report.failed.is_empty());
    }

    #[test]
    fn test_category_pass_missing_source_creates_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("stl");

        let result = organizer(NoWordPolicy::Skip).organize_via_category(&missing);

        assert!(matches!(result, Err(OrganizeError::DirectoryNotFound { .. })));
        assert!(!missing.exists());
        assert_eq!(fs::read_dir(temp_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_fallback_moves_by_leading_word() {
        let temp_dir = TempDir::new().unwrap();
        let other = temp_dir.path().join("other");
        fs::create_dir(&other).unwrap();
        fs::write(other.join("Widget_holder.stl"), "").unwrap();
        fs::write(other.join("Widget_arm.stl"), "").unwrap();

        let report = organizer(NoWordPolicy::Skip)
            .organize_via_filename(&other)
            .unwrap();

        let word = leading_word("Widget_holder").unwrap();
        assert!(other.join(word).join("Widget_holder.stl").is_file());
        assert!(other.join(word).join("Widget_arm.stl").is_file());
        assert!(!other.join("Widget_holder.stl").exists());
        assert_eq!(report.placed_in(word), 2);
    }

    #[test]
    fn test_fallback_skip_policy_leaves_file() {
        let temp_dir = TempDir::new().unwrap();
        let other = temp_dir.path().join("other");
        fs::create_dir(&other).unwrap();
        fs::write(other.join("42.stl"), "").unwrap();

        let report = organizer(NoWordPolicy::Skip)
            .organize_via_filename(&other)
            .unwrap();

        assert!(other.join("42.stl").is_file());
        assert_eq!(report.unmatched, vec![other.join("42.stl")]);
        assert_eq!(report.total_placed(), 0);
    }

    #[test]
    fn test_fallback_catch_all_policy() {
        let temp_dir = TempDir::new().unwrap();
        let other = temp_dir.path().join("other");
        fs::create_dir(&other).unwrap();
        fs::write(other.join("42.stl"), "").unwrap();

        let report = organizer(NoWordPolicy::CatchAll)
            .organize_via_filename(&other)
            .unwrap();

        assert!(other.join("misc").join("42.stl").is_file());
        assert_eq!(report.placed_in("misc"), 1);
    }

    #[test]
    fn test_fallback_fail_policy() {
        let temp_dir = TempDir::new().unwrap();
        let other = temp_dir.path().join("other");
        fs::create_dir(&other).unwrap();
        fs::write(other.join("42.stl"), "").unwrap();

        let result = organizer(NoWordPolicy::Fail).organize_via_filename(&other);

        assert!(matches!(result, Err(OrganizeError::NoFilenameMatch { .. })));
        assert!(other.join("42.stl").is_file());
    }

    #[test]
    fn test_fallback_folder_clash_is_per_file_failure() {
        let temp_dir = TempDir::new().unwrap();
        let other = temp_dir.path().join("other");
        fs::create_dir(&other).unwrap();
        // "Gear" is a file, so the "Gear" group folder cannot be created
        fs::write(other.join("Gear"), "").unwrap();
        fs::write(other.join("Gear.stl"), "").unwrap();
        fs::write(other.join("Bolt.stl"), "").unwrap();

        let report = organizer(NoWordPolicy::Skip)
            .organize_via_filename(&other)
            .unwrap();

        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, other.join("Gear.stl"));
        assert!(other.join("Bolt").join("Bolt.stl").is_file());
    }

    #[test]
    fn test_fallback_existing_destination_keeps_original() {
        let temp_dir = TempDir::new().unwrap();
        let other = temp_dir.path().join("other");
        fs::create_dir_all(other.join("Gear")).unwrap();
        fs::write(other.join("Gear.stl"), "new").unwrap();
        fs::write(other.join("Gear").join("Gear.stl"), "old").unwrap();

        let report = organizer(NoWordPolicy::Skip)
            .organize_via_filename(&other)
            .unwrap();

        assert_eq!(report.skipped, vec![other.join("Gear").join("Gear.stl")]);
        assert_eq!(fs::read_to_string(other.join("Gear.stl")).unwrap(), "new");
        assert_eq!(fs::read_to_string(other.join("Gear").join("Gear.stl")).unwrap(), "old");
    }

    #[test]
    fn test_from_config_rejects_invalid_category() {
        let config = OrganizerConfig {
            categories: vec!["a/b".to_string()],
            ..OrganizerConfig::default()
        };
        assert!(matches!(
            Organizer::from_config(config),
            Err(OrganizeError::Config(_))
        ));
    }

    #[test]
    fn test_run_without_fallback() {
        let temp_dir = TempDir::new().unwrap();
        let source = source_dir(&temp_dir);
        fs::write(source.join("Gear.stl"), "").unwrap();

        let mut settings = Settings::with_categories(".stl", &["core"]).unwrap();
        settings.fallback.enabled = false;
        let report = Organizer::new(settings).run(&source).unwrap();

        assert!(report.fallback.is_none());
        assert!(report.category.other_dir.join("Gear.stl").is_file());
        assert_eq!(report.failures(), 0);
    }
}
