//! Build artifact cleanup.
//!
//! ## Options
//!
//! - `cforge clean` - Remove every object file under the object directory
//! - `cforge clean --all` - Also remove the linked executable
//!
//! Cleaning is idempotent: a second run finds nothing and reports the
//! artifacts as already clean. A failed deletion aborts the clean without
//! restoring what was already removed.

use super::paths::find_object_files;
use crate::config::BuildConfig;
use crate::ui;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CleanRequest {
    Objects,
    ObjectsAndExecutable,
}

impl CleanRequest {
    pub fn includes_executable(self) -> bool {
        matches!(self, CleanRequest::ObjectsAndExecutable)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutableClean {
    NotRequested,
    Removed(PathBuf),
    AlreadyClean,
}

/// What a clean run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub removed_objects: Vec<PathBuf>,
    pub executable: ExecutableClean,
}

impl CleanReport {
    pub fn objects_already_clean(&self) -> bool {
        self.removed_objects.is_empty()
    }

    /// True when nothing was deleted.
    pub fn already_clean(&self) -> bool {
        self.objects_already_clean() && !matches!(self.executable, ExecutableClean::Removed(_))
    }
}

pub fn clean(request: CleanRequest, config: &BuildConfig) -> Result<CleanReport> {
    // 1. Object files
    let objects = find_object_files(&config.object_dir)?;
    if objects.is_empty() {
        ui::info("Object files already cleaned.");
    }
    for obj in &objects {
        ui::step(&format!("Deleting {}.", obj.display()));
        fs::remove_file(obj).with_context(|| format!("Failed to remove {}", obj.display()))?;
    }

    // 2. Executable
    let executable = if request.includes_executable() {
        let exe = config.executable_path();
        if exe.exists() {
            ui::step(&format!("Deleting {}.", exe.display()));
            fs::remove_file(&exe).with_context(|| format!("Failed to remove {}", exe.display()))?;
            ExecutableClean::Removed(exe)
        } else {
            ui::info("Executable already cleaned.");
            ExecutableClean::AlreadyClean
        }
    } else {
        ExecutableClean::NotRequested
    };

    let report = CleanReport {
        removed_objects: objects,
        executable,
    };

    // The "already cleaned" lines above cover the empty case
    if !report.already_clean() {
        ui::success("Clean complete.");
    }
    Ok(report)
}
