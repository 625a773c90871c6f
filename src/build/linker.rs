//! Final link step.
//!
//! The link input is whatever `.o` files sit under the object directory when
//! linking starts, not just the units compiled in this run.

use super::paths::find_object_files;
use super::process::ProcessRunner;
use super::{BuildFailure, BuildResult};
use crate::config::BuildConfig;
use crate::ui;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::PathBuf;

/// `<compiler> <objects>... -o <output> -L<lib_dir> (-l<lib>)*`
pub fn link_args(objects: &[PathBuf], config: &BuildConfig) -> Vec<OsString> {
    let mut args = vec![OsString::from(&config.compiler)];
    args.extend(objects.iter().map(|obj| obj.clone().into_os_string()));

    args.push("-o".into());
    args.push(config.output_path().into_os_string());

    let mut lib_dir = OsString::from("-L");
    lib_dir.push(&config.lib_dir);
    args.push(lib_dir);

    for lib in &config.libraries {
        args.push(format!("-l{}", lib).into());
    }
    args
}

/// Links every object currently under the object directory, including
/// leftovers from earlier builds.
pub fn link<R: ProcessRunner>(config: &BuildConfig, runner: &mut R) -> Result<BuildResult> {
    let objects = find_object_files(&config.object_dir)?;
    let args = link_args(&objects, config);

    ui::step(&format!(
        "Linking {} object file(s) from {}...",
        objects.len(),
        config.object_dir.display()
    ));
    ui::command(&args);

    let status = runner
        .run(&args)
        .with_context(|| format!("while linking {}", config.output_path().display()))?;
    if status != 0 {
        return Ok(BuildResult::Failed(BuildFailure::Link { status }));
    }

    Ok(BuildResult::Success)
}
