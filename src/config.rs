//! Project manifest (`cforge.toml`) parsing.
//!
//! The manifest is deserialized into [`Manifest`] and then turned into a
//! [`BuildConfig`] once per invocation. All directory fields of a
//! `BuildConfig` are absolute, so nothing downstream depends on the
//! process working directory.

use crate::build::PathResolver;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "cforge.toml";

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct Manifest {
    pub package: PackageConfig,
    #[serde(default)]
    pub build: BuildSection,
}

#[derive(Deserialize, Serialize, Debug, Default, Clone)]
pub struct PackageConfig {
    /// Name of the linked executable
    pub name: String,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(default)]
pub struct BuildSection {
    pub compiler: String,
    pub flags: Vec<String>,
    pub source_dir: String,
    pub object_dir: String,
    pub include_dirs: Vec<String>,
    pub lib_dir: String,
    pub libs: Vec<String>,
    pub extensions: Vec<String>,
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            compiler: "g++".to_string(),
            flags: Vec::new(),
            source_dir: "src".to_string(),
            object_dir: "obj".to_string(),
            include_dirs: Vec::new(),
            lib_dir: "lib".to_string(),
            libs: Vec::new(),
            extensions: ["cpp", "cc", "cxx", "c"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

impl Manifest {
    pub fn new(name: &str) -> Self {
        Self {
            package: PackageConfig {
                name: name.to_string(),
            },
            build: BuildSection::default(),
        }
    }
}

/// Immutable settings for one build invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub compiler: String,
    pub output_name: String,
    pub root: PathBuf,
    pub source_dir: PathBuf,
    pub object_dir: PathBuf,
    pub flags: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub lib_dir: PathBuf,
    pub libraries: Vec<String>,
    pub extensions: Vec<String>,
}

impl BuildConfig {
    /// Resolves every directory in `manifest` against `root`.
    pub fn from_manifest(manifest: &Manifest, root: &Path) -> Result<Self> {
        if manifest.package.name.trim().is_empty() {
            anyhow::bail!("[package] name must not be empty in {}", MANIFEST_FILE);
        }
        if manifest.build.compiler.trim().is_empty() {
            anyhow::bail!("[build] compiler must not be empty in {}", MANIFEST_FILE);
        }

        let resolver = PathResolver::new(root)?;
        let build = &manifest.build;

        Ok(Self {
            compiler: build.compiler.clone(),
            output_name: manifest.package.name.clone(),
            root: resolver.root().to_path_buf(),
            source_dir: resolver.resolve(&build.source_dir),
            object_dir: resolver.resolve(&build.object_dir),
            flags: build.flags.clone(),
            include_dirs: build
                .include_dirs
                .iter()
                .map(|dir| resolver.resolve(dir))
                .collect(),
            lib_dir: resolver.resolve(&build.lib_dir),
            libraries: build.libs.clone(),
            extensions: build
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        })
    }

    /// Path handed to the toolchain after `-o` when linking.
    pub fn output_path(&self) -> PathBuf {
        self.root.join(&self.output_name)
    }

    /// Path of the executable as it lands on disk, including the platform suffix.
    pub fn executable_path(&self) -> PathBuf {
        self.root
            .join(format!("{}{}", self.output_name, std::env::consts::EXE_SUFFIX))
    }
}

pub fn parse_manifest(content: &str) -> Result<Manifest> {
    toml::from_str(content).with_context(|| {
        format!(
            "Failed to parse {} - check for syntax errors (missing quotes, brackets)",
            MANIFEST_FILE
        )
    })
}

// --- Load cforge.toml from the project root ---
pub fn load_config(root: &Path) -> Result<BuildConfig> {
    let manifest_path = root.join(MANIFEST_FILE);
    if !manifest_path.exists() {
        return Err(anyhow::anyhow!(
            "{} not found in {}.\n\n\
            💡 Tip: Run 'cforge init' to create one.",
            MANIFEST_FILE,
            root.display()
        ));
    }

    let content = fs::read_to_string(&manifest_path).with_context(|| {
        format!(
            "Failed to read {} - check file permissions",
            manifest_path.display()
        )
    })?;
    let manifest = parse_manifest(&content)?;

    BuildConfig::from_manifest(&manifest, root)
}

/// Writes a default manifest into `root`. Returns the path written.
pub fn init_manifest(root: &Path, name: &str) -> Result<PathBuf> {
    let manifest_path = root.join(MANIFEST_FILE);
    if manifest_path.exists() {
        anyhow::bail!("{} already exists", manifest_path.display());
    }

    let content = toml::to_string_pretty(&Manifest::new(name))
        .context("Failed to serialize default manifest")?;
    fs::write(&manifest_path, content)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    Ok(manifest_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENGINE_MANIFEST: &str = r#"
[package]
name = "engine"

[build]
compiler = "clang++"
flags = ["-Wall", "-std=c++17"]
include_dirs = ["deps/include", "deps/include/glfw"]
lib_dir = "deps/libs"
libs = ["glfw3dll", "gdi32", "vulkan-1"]
extensions = [".cpp"]
"#;

    #[test]
    fn test_parse_full_manifest() {
        let manifest = parse_manifest(ENGINE_MANIFEST).unwrap();
        assert_eq!(manifest.package.name, "engine");
        assert_eq!(manifest.build.compiler, "clang++");
        assert_eq!(manifest.build.libs, vec!["glfw3dll", "gdi32", "vulkan-1"]);
        // Unspecified keys fall back to defaults
        assert_eq!(manifest.build.source_dir, "src");
        assert_eq!(manifest.build.object_dir, "obj");
    }

    #[test]
    fn test_missing_build_section_uses_defaults() {
        let manifest = parse_manifest("[package]\nname = \"app\"\n").unwrap();
        assert_eq!(manifest.build.compiler, "g++");
        assert!(manifest.build.flags.is_empty());
        assert_eq!(manifest.build.extensions, vec!["cpp", "cc", "cxx", "c"]);
    }

    #[test]
    fn test_from_manifest_resolves_absolute_dirs() {
        let manifest = parse_manifest(ENGINE_MANIFEST).unwrap();
        let config = BuildConfig::from_manifest(&manifest, Path::new("/work/engine")).unwrap();

        assert_eq!(config.source_dir, Path::new("/work/engine/src"));
        assert_eq!(config.object_dir, Path::new("/work/engine/obj"));
        assert_eq!(config.lib_dir, Path::new("/work/engine/deps/libs"));
        assert_eq!(
            config.include_dirs,
            vec![
                PathBuf::from("/work/engine/deps/include"),
                PathBuf::from("/work/engine/deps/include/glfw"),
            ]
        );
        assert!(config.include_dirs.iter().all(|dir| dir.is_absolute()));
        assert_eq!(config.extensions, vec!["cpp"]);
        assert_eq!(config.output_path(), Path::new("/work/engine/engine"));
    }

    #[test]
    fn test_empty_name_rejected() {
        let manifest = parse_manifest("[package]\nname = \"  \"\n").unwrap();
        assert!(BuildConfig::from_manifest(&manifest, Path::new("/tmp")).is_err());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(parse_manifest("[package\nname = ").is_err());
    }

    #[test]
    fn test_load_config_missing_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_config(dir.path()).unwrap_err();
        assert!(err.to_string().contains("cforge init"));
    }

    #[test]
    fn test_init_then_load() {
        let dir = tempfile::tempdir().unwrap();
        init_manifest(dir.path(), "demo").unwrap();

        let config = load_config(dir.path()).unwrap();
        assert_eq!(config.output_name, "demo");
        assert_eq!(config.compiler, "g++");

        // Refuses to overwrite
        assert!(init_manifest(dir.path(), "demo").is_err());
    }
}
