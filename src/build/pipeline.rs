//! Build orchestration.
//!
//! A [`Pipeline`] runs one [`Request`] through an explicit state machine:
//!
//! ```text
//! Idle → Discovering → Compiling → Linking → Done
//! Idle → Cleaning → Done
//! ```
//!
//! Any failure moves straight to `Failed`, skipping every remaining state.
//! The final state stays inspectable through [`Pipeline::state`].

use super::clean::{CleanReport, CleanRequest, clean};
use super::compiler::{compile_all, discover_units};
use super::linker::link;
use super::process::ProcessRunner;
use super::{BuildFailure, BuildResult};
use crate::config::BuildConfig;
use crate::ui;
use anyhow::{Context, Result};
use std::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    Build { debug: bool },
    Clean(CleanRequest),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Discovering,
    Compiling,
    Linking,
    Cleaning,
    Done,
    Failed(BuildFailure),
}

pub struct Pipeline<'a, R: ProcessRunner> {
    config: &'a BuildConfig,
    runner: R,
    state: PipelineState,
    history: Vec<PipelineState>,
    clean_report: Option<CleanReport>,
}

impl<'a, R: ProcessRunner> Pipeline<'a, R> {
    pub fn new(config: &'a BuildConfig, runner: R) -> Self {
        Self {
            config,
            runner,
            state: PipelineState::Idle,
            history: vec![PipelineState::Idle],
            clean_report: None,
        }
    }

    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Every state entered so far, starting with `Idle`.
    pub fn history(&self) -> &[PipelineState] {
        &self.history
    }

    pub fn clean_report(&self) -> Option<&CleanReport> {
        self.clean_report.as_ref()
    }

    pub fn into_runner(self) -> R {
        self.runner
    }

    /// Drives `request` to a terminal state. A pipeline runs at most once.
    ///
    /// Returns `Err` exactly when the pipeline ends in `Failed`.
    pub fn run(&mut self, request: Request) -> Result<()> {
        if self.state != PipelineState::Idle {
            anyhow::bail!("Pipeline already ran (state: {:?})", self.state);
        }

        match request {
            Request::Build { debug } => self.build(debug),
            Request::Clean(clean_request) => self.clean(clean_request),
        }
    }

    fn transition(&mut self, next: PipelineState) {
        self.state = next.clone();
        self.history.push(next);
    }

    fn fail(&mut self, failure: BuildFailure) -> anyhow::Error {
        self.transition(PipelineState::Failed(failure.clone()));
        anyhow::Error::new(failure)
    }

    /// Moves to `Failed` if `result` is an error.
    fn guard<T>(&mut self, result: Result<T>) -> Result<T> {
        result.map_err(|err| {
            self.transition(PipelineState::Failed(BuildFailure::Filesystem {
                reason: format!("{:#}", err),
            }));
            err
        })
    }

    fn build(&mut self, debug: bool) -> Result<()> {
        let config = self.config;

        // 1. Discover
        self.transition(PipelineState::Discovering);
        ui::banner(debug);

        // A dry run leaves the project tree untouched
        if self.runner.touches_filesystem() {
            let created = fs::create_dir_all(&config.object_dir).with_context(|| {
                format!(
                    "Failed to create object directory {}",
                    config.object_dir.display()
                )
            });
            self.guard(created)?;
        }

        let discovered = discover_units(config);
        let units = self.guard(discovered)?;
        if units.is_empty() {
            ui::warn(&format!(
                "No source files found in {}, linking existing objects only",
                config.source_dir.display()
            ));
        }

        // 2. Compile
        self.transition(PipelineState::Compiling);
        let compiled = compile_all(&units, config, debug, &mut self.runner);
        if let BuildResult::Failed(failure) = self.guard(compiled)? {
            return Err(self.fail(failure));
        }
        ui::success("Compilation succeeded.");

        // 3. Link
        self.transition(PipelineState::Linking);
        let linked = link(config, &mut self.runner);
        if let BuildResult::Failed(failure) = self.guard(linked)? {
            return Err(self.fail(failure));
        }
        ui::success("Linking succeeded.");

        self.transition(PipelineState::Done);
        println!();
        ui::success(&format!(
            "Executable built: {}",
            config.executable_path().display()
        ));
        Ok(())
    }

    fn clean(&mut self, request: CleanRequest) -> Result<()> {
        self.transition(PipelineState::Cleaning);

        let cleaned = clean(request, self.config);
        self.clean_report = Some(self.guard(cleaned)?);

        self.transition(PipelineState::Done);
        Ok(())
    }
}
