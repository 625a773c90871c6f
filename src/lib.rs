//! # cforge - Minimal C/C++ Build Orchestrator
//!
//! cforge drives an external compiler (`g++`, `clang++`, ...) through a
//! fixed pipeline: discover translation units, compile each one to an
//! object file, link every object into a single executable.
//!
//! ## Quick Start
//!
//! ```bash
//! # Write a default cforge.toml
//! cforge init --name engine
//!
//! # Release build (-O2), then a debug build (-g)
//! cforge build
//! cforge build --debug
//!
//! # Remove object files, or objects plus the executable
//! cforge clean
//! cforge clean --all
//! ```
//!
//! ## Module Organization
//!
//! - [`build`] - Discovery, compile, link, clean and the pipeline state machine
//! - [`config`] - Configuration parsing (`cforge.toml`)
//! - [`ui`] - Console output

/// Build pipeline over an external toolchain.
pub mod build;

/// Configuration file parsing (`cforge.toml`).
pub mod config;

/// Terminal UI utilities.
pub mod ui;
