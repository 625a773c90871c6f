//! Toolchain process execution.
//!
//! Everything that spawns the compiler goes through [`ProcessRunner`], so the
//! compile and link steps can be exercised without a real toolchain.

use anyhow::{Context, Result};
use colored::*;
use std::collections::VecDeque;
use std::ffi::{OsStr, OsString};
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Exit status reported when the child was terminated by a signal.
pub const SIGNAL_EXIT_STATUS: i32 = -1;

/// Runs a program synchronously and reports its exit status.
///
/// `argv[0]` is the program; a non-zero status is the only failure signal.
/// An `Err` means the program could not be started at all. Arguments are
/// passed through byte-for-byte, so non-UTF-8 paths reach the toolchain intact.
pub trait ProcessRunner {
    fn run(&mut self, argv: &[OsString]) -> Result<i32>;

    /// False for runners that only report what they would do.
    fn touches_filesystem(&self) -> bool {
        true
    }
}

impl<R: ProcessRunner + ?Sized> ProcessRunner for &mut R {
    fn run(&mut self, argv: &[OsString]) -> Result<i32> {
        (**self).run(argv)
    }

    fn touches_filesystem(&self) -> bool {
        (**self).touches_filesystem()
    }
}

/// What happens to the child's standard streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Child writes straight to our terminal
    #[default]
    Inherit,
    /// Child output is discarded
    Null,
}

/// Spawns real processes via `std::process::Command`.
#[derive(Debug, Default)]
pub struct SystemRunner {
    working_dir: Option<PathBuf>,
    stdio: StdioMode,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&mut self, argv: &[OsString]) -> Result<i32> {
        let (program, args) = argv
            .split_first()
            .context("Cannot run an empty command line")?;

        let mut cmd = Command::new(program);
        cmd.args(args);
        if let Some(dir) = &self.working_dir {
            cmd.current_dir(dir);
        }
        if self.stdio == StdioMode::Null {
            cmd.stdout(Stdio::null()).stderr(Stdio::null());
        }

        let status = cmd.status().with_context(|| {
            format!(
                "Failed to execute '{}' - is it installed and on PATH?",
                program.to_string_lossy()
            )
        })?;

        Ok(status.code().unwrap_or(SIGNAL_EXIT_STATUS))
    }
}

/// Prints each command instead of running it and reports success.
#[derive(Debug, Default)]
pub struct DryRunRunner {
    pub commands: Vec<Vec<OsString>>,
}

impl ProcessRunner for DryRunRunner {
    fn run(&mut self, argv: &[OsString]) -> Result<i32> {
        println!("   {} Would execute: {}", "»".cyan(), crate::ui::format_command(argv));
        self.commands.push(argv.to_vec());
        Ok(0)
    }

    fn touches_filesystem(&self) -> bool {
        false
    }
}

/// Test double: records every argv and replies with scripted exit codes.
///
/// Exit codes are consumed in order; once the script runs out every further
/// call succeeds. [`RecordingRunner::fail_when`] fails any call with an
/// argument containing the given text, regardless of the script.
#[derive(Debug, Default)]
pub struct RecordingRunner {
    pub calls: Vec<Vec<OsString>>,
    script: VecDeque<i32>,
    fail_on: Vec<(String, i32)>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_exit_codes(codes: impl IntoIterator<Item = i32>) -> Self {
        Self {
            script: codes.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn fail_when(mut self, arg: impl Into<String>, status: i32) -> Self {
        self.fail_on.push((arg.into(), status));
        self
    }

    /// Calls whose argv contains `arg`.
    pub fn calls_with(&self, arg: impl AsRef<OsStr>) -> Vec<&Vec<OsString>> {
        let arg = arg.as_ref();
        self.calls
            .iter()
            .filter(|argv| argv.iter().any(|a| a.as_os_str() == arg))
            .collect()
    }
}

impl ProcessRunner for RecordingRunner {
    fn run(&mut self, argv: &[OsString]) -> Result<i32> {
        self.calls.push(argv.to_vec());

        let forced = self
            .fail_on
            .iter()
            .find(|(needle, _)| {
                argv.iter()
                    .any(|a| a.to_string_lossy().contains(needle.as_str()))
            })
            .map(|(_, status)| *status);

        Ok(forced.unwrap_or_else(|| self.script.pop_front().unwrap_or(0)))
    }
}
