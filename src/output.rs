//! Output formatting and styling module.
//!
//! All progress lines go through here: colored notices, the per-pass spinner
//! and the folder summary table.

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::time::Duration;

/// Prints CLI output with consistent styling.
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stl_organizer::output::OutputFormatter;
    /// OutputFormatter::success("Copied core.stl to stl/stl_organized/core");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a summary table with file counts per destination folder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use stl_organizer::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("core".to_string(), 3);
    /// counts.insert("other".to_string(), 8);
    /// OutputFormatter::summary_table("CATEGORY PASS", &counts, 2);
    /// ```
    pub fn summary_table(title: &str, folder_counts: &BTreeMap<String, usize>, skipped: usize) {
        Self::header(title);

        let width = folder_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(7); // "Skipped"

        println!("{:<width$} | {}", "Folder".bold(), "Files".bold(), width = width);
        println!("{}", "-".repeat(width + 10));

        for (folder, count) in folder_counts {
            println!(
                "{:<width$} | {} {}",
                folder,
                count.to_string().green(),
                file_word(*count),
                width = width
            );
        }

        println!("{}", "-".repeat(width + 10));
        let total: usize = folder_counts.values().sum();
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total.to_string().green().bold(),
            file_word(total),
            width = width
        );
        if skipped > 0 {
            println!(
                "{:<width$} | {} {}",
                "Skipped",
                skipped.to_string().yellow(),
                file_word(skipped),
                width = width
            );
        }
    }
}

fn file_word(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

/// Spinner shown while a pass walks its directory.
///
/// The spinner draws on stderr and stays hidden when stderr is not a
/// terminal. Notices must be printed through [`Progress::suspend`] so they do
/// not tear the spinner line.
pub struct Progress {
    bar: ProgressBar,
}

impl Progress {
    /// Starts a spinner labelled with `prefix`.
    pub fn spinner(prefix: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {prefix:.bold} [{pos}] {wide_msg}")
                .expect("Invalid spinner template"),
        );
        bar.set_prefix(prefix.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// A progress handle that never draws.
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
        }
    }

    /// Records one processed file.
    pub fn tick(&self, file_name: &str) {
        self.bar.set_message(file_name.to_string());
        self.bar.inc(1);
    }

    /// Runs `f` with the spinner cleared from the screen.
    pub fn suspend<F: FnOnce() -> R, R>(&self, f: F) -> R {
        self.bar.suspend(f)
    }
}

impl Drop for Progress {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
    }
}
