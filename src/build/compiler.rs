//! Per-unit compilation.
//!
//! Each source file is compiled on its own with the toolchain's compile-only
//! mode. Units run one after another in discovery order and the first
//! non-zero exit stops the rest.

use super::paths::{derive_object_path, find_files_with_extensions};
use super::process::ProcessRunner;
use super::{BuildFailure, BuildResult};
use crate::config::BuildConfig;
use crate::ui;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::ffi::OsString;
use std::path::PathBuf;

/// A discovered source file and the object file it compiles to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceUnit {
    pub source: PathBuf,
    pub object: PathBuf,
}

impl SourceUnit {
    pub fn new(source: PathBuf, config: &BuildConfig) -> Result<Self> {
        let object = derive_object_path(&source, &config.object_dir)?;
        Ok(Self { source, object })
    }
}

/// All compilable sources under the source root, in path order.
pub fn discover_units(config: &BuildConfig) -> Result<Vec<SourceUnit>> {
    let sources = find_files_with_extensions(&config.source_dir, &config.extensions)?;
    let units = sources
        .into_iter()
        .map(|source| SourceUnit::new(source, config))
        .collect::<Result<Vec<_>>>()?;

    // Objects are laid out flat, so equal stems overwrite each other
    let mut seen: HashMap<&PathBuf, &PathBuf> = HashMap::new();
    for unit in &units {
        if let Some(first) = seen.insert(&unit.object, &unit.source) {
            ui::warn(&format!(
                "{} and {} both compile to {}",
                first.display(),
                unit.source.display(),
                unit.object.display()
            ));
        }
    }

    Ok(units)
}

/// `<compiler> -c <source> <-O2|-g> <flags>... (-I <dir>)* -o <object>`
pub fn compile_args(unit: &SourceUnit, config: &BuildConfig, debug: bool) -> Vec<OsString> {
    let mut args = vec![
        OsString::from(&config.compiler),
        OsString::from("-c"),
        unit.source.clone().into_os_string(),
    ];

    if debug {
        args.push("-g".into());
    } else {
        args.push("-O2".into());
    }

    args.extend(config.flags.iter().map(OsString::from));

    for dir in &config.include_dirs {
        args.push("-I".into());
        args.push(dir.clone().into_os_string());
    }

    args.push("-o".into());
    args.push(unit.object.clone().into_os_string());
    args
}

pub fn compile_one<R: ProcessRunner>(
    unit: &SourceUnit,
    config: &BuildConfig,
    debug: bool,
    runner: &mut R,
) -> Result<BuildResult> {
    let args = compile_args(unit, config, debug);

    ui::step(&format!("Compiling {}...", unit.source.display()));
    ui::command(&args);

    let status = runner
        .run(&args)
        .with_context(|| format!("while compiling {}", unit.source.display()))?;
    if status != 0 {
        return Ok(BuildResult::Failed(BuildFailure::Compile {
            source: unit.source.clone(),
            status,
        }));
    }

    Ok(BuildResult::Success)
}

/// Compiles `units` in order, stopping at the first failure.
pub fn compile_all<R: ProcessRunner>(
    units: &[SourceUnit],
    config: &BuildConfig,
    debug: bool,
    runner: &mut R,
) -> Result<BuildResult> {
    for unit in units {
        let result = compile_one(unit, config, debug, runner)?;
        if !result.is_success() {
            return Ok(result);
        }
    }
    Ok(BuildResult::Success)
}
