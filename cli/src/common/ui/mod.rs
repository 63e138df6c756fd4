//! # DruDock UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! This module defines the `Reporter` abstraction through which every command and
//! the process runner talk to the user. Command handlers never `println!` directly;
//! they call `info`, `warning`, `error` and `section` on a reporter that is passed
//! to them explicitly.
//!
//! ## Architecture
//!
//! - **`Reporter`**: The four-method trait (`info`, `warning`, `error`, `section`).
//! - **`ConsoleReporter`**: The terminal implementation used by `main`. Honours the
//!   global `--quiet` and `--clean-output` flags; colours come from `console` and
//!   follow `--ansi` / `--no-ansi`.
//! - **`RecordingReporter`**: Collects `Report` events in memory. Used to run a
//!   subprocess silently and capture its output, and by tests.
//! - **`prompt`**: A `dialoguer` text prompt that degrades to a default value (or an
//!   error) when `--no-interaction` is set.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::ui::{ConsoleReporter, Reporter};
//!
//! let reporter = ConsoleReporter::new(false, false);
//! reporter.section("REDIS ::: Info");
//! reporter.info("redis_version:6.2.6");
//! reporter.warning("Your installed DruDock version differs from the app config version");
//! ```
//!
use crate::core::error::{DrudockError, Result};
use anyhow::{anyhow, Context};
use console::style;
use std::sync::Mutex;

/// Structured output sink used by commands and the process runner.
pub trait Reporter: Send + Sync {
    /// Regular progress or subprocess output.
    fn info(&self, text: &str);
    /// Non-fatal problem the user should notice.
    fn warning(&self, text: &str);
    /// Fatal problem, printed just before the tool exits.
    fn error(&self, text: &str);
    /// Heading for a block of related output (e.g. `REDIS ::: Info`).
    fn section(&self, title: &str);
}

/// Terminal reporter. Info goes to stdout; warnings and errors go to stderr.
#[derive(Debug, Clone, Default)]
pub struct ConsoleReporter {
    quiet: bool,
    clean_output: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool, clean_output: bool) -> Self {
        Self {
            quiet,
            clean_output,
        }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, text: &str) {
        if !self.quiet {
            println!("{}", text);
        }
    }

    fn warning(&self, text: &str) {
        if !self.quiet {
            eprintln!("{} {}", style("[WARNING]").yellow().bold(), text);
        }
    }

    fn error(&self, text: &str) {
        // Errors are never silenced, even under --quiet.
        eprintln!("{} {}", style("[ERROR]").red().bold(), text);
    }

    fn section(&self, title: &str) {
        if self.quiet || self.clean_output {
            return;
        }
        println!();
        println!("{}", style(title).cyan().bold());
        println!("{}", style("=".repeat(title.chars().count())).cyan());
    }
}

/// One captured reporter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Report {
    Info(String),
    Warning(String),
    Error(String),
    Section(String),
}

/// In-memory reporter. Thread-safe so it can be shared with async tasks.
#[derive(Debug, Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<Report>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event recorded so far, in call order.
    pub fn events(&self) -> Vec<Report> {
        self.lock().clone()
    }

    /// Texts of all `warning` calls.
    pub fn warnings(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|r| match r {
                Report::Warning(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    /// Texts of all `info` calls.
    pub fn infos(&self) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|r| match r {
                Report::Info(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    fn push(&self, report: Report) {
        self.lock().push(report);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Report>> {
        // A poisoned lock only means a panicking test thread; the data is still usable.
        self.events.lock().unwrap_or_else(|p| p.into_inner())
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, text: &str) {
        self.push(Report::Info(text.to_string()));
    }
    fn warning(&self, text: &str) {
        self.push(Report::Warning(text.to_string()));
    }
    fn error(&self, text: &str) {
        self.push(Report::Error(text.to_string()));
    }
    fn section(&self, title: &str) {
        self.push(Report::Section(title.to_string()));
    }
}

/// Asks the user for a value, pre-filled with `default` when one is known.
///
/// With `interactive == false` no prompt is shown: the default is returned, or an
/// `ArgumentParsing` error naming the value if there is no default.
pub fn prompt(label: &str, default: Option<&str>, interactive: bool) -> Result<String> {
    if !interactive {
        return default.map(str::to_string).ok_or_else(|| {
            anyhow!(DrudockError::ArgumentParsing(format!(
                "A value for '{}' is required and --no-interaction is set.",
                label
            )))
        });
    }
    let mut input = dialoguer::Input::<String>::new().with_prompt(label);
    if let Some(d) = default {
        input = input.default(d.to_string());
    }
    input
        .interact_text()
        .with_context(|| format!("Failed to read a value for '{}'", label))
}

/// Asks a yes/no question. Without interaction the default answer is taken.
pub fn confirm(question: &str, default: bool, interactive: bool) -> Result<bool> {
    if !interactive {
        return Ok(default);
    }
    dialoguer::Confirm::new()
        .with_prompt(question)
        .default(default)
        .interact()
        .with_context(|| format!("Failed to read an answer to '{}'", question))
}
