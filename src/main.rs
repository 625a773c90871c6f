//! # cforge CLI Entry Point
//!
//! Parses arguments with clap and hands a single [`Request`] to the build
//! pipeline. Running `cforge` without a subcommand is the same as
//! `cforge build`.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{Shell, generate};
use colored::*;
use std::path::PathBuf;

use cforge::build::{
    CleanRequest, DryRunRunner, Pipeline, PipelineState, ProcessRunner, Request, SystemRunner,
};
use cforge::config;
use cforge::ui;

#[cfg(windows)]
#[link(name = "kernel32")]
unsafe extern "system" {
    fn SetConsoleOutputCP(wCodePageID: u32) -> i32;
}

#[cfg(windows)]
fn enable_windows_utf8_console() {
    unsafe {
        SetConsoleOutputCP(65001);
    }
}

#[cfg(not(windows))]
fn enable_windows_utf8_console() {}

#[derive(Parser)]
#[command(name = "cforge")]
#[command(about = "A minimal C/C++ build orchestrator", version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
struct Cli {
    /// Project root containing cforge.toml
    #[arg(long, global = true, default_value = ".")]
    manifest_dir: PathBuf,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile every source file and link the executable
    Build {
        /// Compile with debug symbols (-g) instead of optimizations (-O2)
        #[arg(long)]
        debug: bool,
        /// Show what would be executed without running
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete object files
    Clean {
        /// Also delete the linked executable
        #[arg(long)]
        all: bool,
    },
    /// Write a default cforge.toml in the project root
    Init {
        /// Executable name [default: name of the project directory]
        #[arg(long)]
        name: Option<String>,
    },
    /// Generate shell completion scripts
    Completion { shell: Shell },
}

fn main() -> Result<()> {
    enable_windows_utf8_console();

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Build {
        debug: false,
        dry_run: false,
    });

    match command {
        Commands::Build { debug, dry_run } => {
            let config = config::load_config(&cli.manifest_dir)?;
            if dry_run {
                println!("{} DRY RUN - nothing will be executed\n", "»".cyan());
                execute(&config, Request::Build { debug }, DryRunRunner::default())
            } else {
                let runner = SystemRunner::new().working_dir(&config.root);
                execute(&config, Request::Build { debug }, runner)
            }
        }
        Commands::Clean { all } => {
            let config = config::load_config(&cli.manifest_dir)?;
            let request = if all {
                CleanRequest::ObjectsAndExecutable
            } else {
                CleanRequest::Objects
            };
            execute(&config, Request::Clean(request), SystemRunner::new())
        }
        Commands::Init { name } => {
            let root = std::path::absolute(&cli.manifest_dir)?;
            let name = name.unwrap_or_else(|| {
                root.file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| "app".to_string())
            });
            let path = config::init_manifest(&root, &name)?;
            ui::success(&format!("Created {}", path.display()));
            Ok(())
        }
        Commands::Completion { shell } => {
            let mut cmd = Cli::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
            Ok(())
        }
    }
}

fn execute<R: ProcessRunner>(
    config: &config::BuildConfig,
    request: Request,
    runner: R,
) -> Result<()> {
    let mut pipeline = Pipeline::new(config, runner);
    if let Err(e) = pipeline.run(request) {
        ui::error(&format!("{:#}", e));
        if let PipelineState::Failed(failure) = pipeline.state() {
            ui::info(&format!("Stopped at: {}", failure.unit()));
        }
        std::process::exit(1);
    }
    Ok(())
}
