//! Command-line interface module for stl-organizer.
//!
//! This module handles:
//! - Flag parsing
//! - Merging flags over the configuration file
//! - Running both passes and printing their summaries

use crate::config::{ConfigError, OrganizerConfig};
use crate::organize::{Organizer, RunReport};
use crate::output::OutputFormatter;
use clap::Parser;
use std::env;
use std::path::{Path, PathBuf};

/// Organize files into a `<target_dir>_organized` directory.
#[derive(Debug, Default, Parser)]
#[command(name = "stl-organizer", version, about)]
pub struct Cli {
    /// Directory containing the files, relative to the current directory [default: stl]
    #[arg(short = 'd', long = "target_dir", value_name = "DIR")]
    pub target_dir: Option<PathBuf>,

    /// Only organize files whose names end with this suffix; "" organizes every file [default: .stl]
    #[arg(short, long, value_name = "EXT")]
    pub extension: Option<String>,

    /// Configuration file to use instead of the discovered one
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Category keyword, in priority order; repeat to replace the configured list
    #[arg(short = 'k', long = "category", value_name = "KEYWORD")]
    pub categories: Vec<String>,

    /// Stop after the category pass
    #[arg(long)]
    pub no_fallback: bool,
}

impl Cli {
    /// Loads the configuration and applies the command-line overrides.
    pub fn resolve_config(&self) -> Result<OrganizerConfig, ConfigError> {
        let mut config = OrganizerConfig::load(self.config.as_deref())?;
        self.apply_overrides(&mut config);
        Ok(config)
    }

    /// Flags win over whatever the configuration file says.
    pub fn apply_overrides(&self, config: &mut OrganizerConfig) {
        if let Some(target_dir) = &self.target_dir {
            config.target_dir = target_dir.clone();
        }
        if let Some(extension) = &self.extension {
            config.extension = extension.clone();
        }
        if !self.categories.is_empty() {
            config.categories = self.categories.clone();
        }
        if self.no_fallback {
            config.fallback.enabled = false;
        }
    }
}

/// Runs the CLI application with parsed flags.
///
/// The target directory is resolved against the current working directory.
///
/// # Examples
///
/// ```no_run
/// use clap::Parser;
/// use stl_organizer::cli::{Cli, run_cli};
///
/// let cli = Cli::parse_from(["stl-organizer", "-d", "models", "-e", ".stl"]);
/// match run_cli(&cli) {
///     Ok(_) => println!("Done"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run_cli(cli: &Cli) -> Result<RunReport, String> {
    let config = cli
        .resolve_config()
        .map_err(|e| format!("Error loading configuration: {}", e))?;
    let cwd = env::current_dir()
        .map_err(|e| format!("Error reading current directory: {}", e))?;

    run_with_config(config, &cwd)
}

/// Runs both passes for `config`, resolving `config.target_dir` against
/// `base_dir`.
///
/// Returns an error for fatal failures, and also when any single file
/// could not be placed, after both passes have finished.
pub fn run_with_config(config: OrganizerConfig, base_dir: &Path) -> Result<RunReport, String> {
    let target_dir = base_dir.join(&config.target_dir);
    OutputFormatter::info(&format!("target_dir: {}", target_dir.display()));
    OutputFormatter::info(&format!("extension: {:?}", config.extension));

    let organizer = Organizer::from_config(config)
        .map_err(|e| format!("Error compiling configuration: {}", e))?
        .with_progress(true);

    let report = organizer.run(&target_dir).map_err(|e| e.to_string())?;
    print_summary(&report);

    let failures = report.failures();
    if failures > 0 {
        return Err(format!(
            "{} {} could not be organized. Please review errors above.",
            failures,
            if failures == 1 { "file" } else { "files" }
        ));
    }

    OutputFormatter::success(&format!(
        "Organized into {}",
        report.category.organized_dir.display()
    ));
    Ok(report)
}

fn print_summary(report: &RunReport) {
    let category = &report.category.report;
    OutputFormatter::summary_table("CATEGORY PASS", &category.placed, category.skipped.len());

    match &report.fallback {
        Some(fallback) => {
            OutputFormatter::summary_table(
                "FALLBACK PASS",
                &fallback.placed,
                fallback.skipped.len(),
            );
            if !fallback.unmatched.is_empty() {
                OutputFormatter::warning(&format!(
                    "{} left in {} without a leading word:",
                    fallback.unmatched.len(),
                    report.category.other_dir.display()
                ));
                for path in &fallback.unmatched {
                    OutputFormatter::plain(&format!("  - {}", path.display()));
                }
            }
        }
        None => OutputFormatter::info("Fallback pass disabled"),
    }
}
