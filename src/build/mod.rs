//! The build pipeline: discover → compile → link, plus artifact cleanup.
//!
//! Compilation is strictly sequential and fail-fast. The first unit whose
//! toolchain invocation exits non-zero stops the pipeline; nothing after it
//! is compiled and the link step never runs.

mod clean;
mod compiler;
mod linker;
mod paths;
mod pipeline;
mod process;

pub use clean::{CleanReport, CleanRequest, ExecutableClean, clean};
pub use compiler::{SourceUnit, compile_all, compile_args, compile_one, discover_units};
pub use linker::{link, link_args};
pub use paths::{
    OBJECT_EXTENSION, PathResolver, derive_object_path, find_files_with_extensions,
    find_object_files,
};
pub use pipeline::{Pipeline, PipelineState, Request};
pub use process::{
    DryRunRunner, ProcessRunner, RecordingRunner, SIGNAL_EXIT_STATUS, StdioMode, SystemRunner,
};

use std::fmt;
use std::path::PathBuf;

/// Why a pipeline stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildFailure {
    /// The toolchain exited non-zero while compiling `source`
    Compile { source: PathBuf, status: i32 },
    /// The toolchain exited non-zero while linking
    Link { status: i32 },
    /// An artifact could not be created, removed or listed, or the toolchain
    /// could not be started
    Filesystem { reason: String },
}

impl BuildFailure {
    /// Short identity of what failed: a source path or `link`.
    pub fn unit(&self) -> String {
        match self {
            BuildFailure::Compile { source, .. } => source.display().to_string(),
            BuildFailure::Link { .. } => "link".to_string(),
            BuildFailure::Filesystem { .. } => "filesystem".to_string(),
        }
    }
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildFailure::Compile { source, status } => write!(
                f,
                "Compilation error on {} (exit status {}), building stopped",
                source.display(),
                status
            ),
            BuildFailure::Link { status } => {
                write!(f, "Linking error (exit status {})", status)
            }
            BuildFailure::Filesystem { reason } => write!(f, "Filesystem error: {}", reason),
        }
    }
}

impl std::error::Error for BuildFailure {}

/// Outcome of one compile or link step.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildResult {
    Success,
    Failed(BuildFailure),
}

impl BuildResult {
    pub fn is_success(&self) -> bool {
        matches!(self, BuildResult::Success)
    }
}
