//! Path resolution and artifact discovery.

use anyhow::{Context, Result};
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Extension given to every object artifact.
pub const OBJECT_EXTENSION: &str = "o";

/// Resolves project-relative paths against a fixed absolute root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    /// Anchors the resolver at `root`, made absolute against the working directory.
    pub fn new(root: &Path) -> Result<Self> {
        let root = if root.is_absolute() {
            root.to_path_buf()
        } else {
            std::env::current_dir()
                .context("Failed to read current directory")?
                .join(root)
        };
        Ok(Self {
            root: normalize(&root),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute form of `path`. Absolute inputs are only normalized.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            normalize(path)
        } else {
            normalize(&self.root.join(path))
        }
    }
}

/// Lexically removes `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Object path for `source`: its file stem plus `.o`, rooted under `object_dir`.
///
/// Only the last extension is replaced, so `foo.test.cpp` maps to `foo.test.o`
/// and an extensionless `Makefile` maps to `Makefile.o`.
pub fn derive_object_path(source: &Path, object_dir: &Path) -> Result<PathBuf> {
    let stem = source
        .file_stem()
        .with_context(|| format!("Source path has no file name: {}", source.display()))?;

    let mut file_name = stem.to_os_string();
    file_name.push(".");
    file_name.push(OBJECT_EXTENSION);

    Ok(object_dir.join(file_name))
}

/// Recursively finds files under `dir` whose extension is in `extensions`,
/// sorted by path. A missing directory yields no files.
pub fn find_files_with_extensions(dir: &Path, extensions: &[String]) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if let Some(ext) = path.extension() {
            let ext = ext.to_string_lossy();
            if extensions.iter().any(|wanted| wanted.as_str() == ext) {
                files.push(path.to_path_buf());
            }
        }
    }

    Ok(files)
}

/// Every object artifact currently present under `object_dir`.
pub fn find_object_files(object_dir: &Path) -> Result<Vec<PathBuf>> {
    find_files_with_extensions(object_dir, &[OBJECT_EXTENSION.to_string()])
}
