//! rune-stack xtask - Build automation tasks
//!
//! ## Usage
//!
//! ```bash
//! # Build the rune-stack binary
//! cargo xtask build
//!
//! # Run all tests
//! cargo xtask test
//!
//! # Run lints
//! cargo xtask lint
//!
//! # Check against a live swarm (needs docker and a stack name)
//! cargo xtask smoke my-stack
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use xshell::{cmd, Shell};

#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Build automation for rune-stack")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the rune-stack binary
    Build {
        /// Build in release mode
        #[arg(long)]
        release: bool,
    },
    /// Run all tests
    Test {
        /// Run tests in release mode
        #[arg(long)]
        release: bool,
    },
    /// Run lints (clippy and rustfmt check)
    Lint,
    /// Format code
    Fmt {
        /// Check formatting without making changes
        #[arg(long)]
        check: bool,
    },
    /// Clean build artifacts
    Clean,
    /// Install rune-stack locally
    Install,
    /// Generate documentation
    Doc {
        /// Open documentation in browser
        #[arg(long)]
        open: bool,
    },
    /// Read-only checks against a live swarm
    Smoke {
        /// Stack to inspect
        stack: String,
    },
    /// Run CI checks (lint, test, build)
    Ci,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    let project_root = project_root()?;
    sh.change_dir(&project_root);

    match cli.command {
        Commands::Build { release } => build(&sh, release)?,
        Commands::Test { release } => test(&sh, release)?,
        Commands::Lint => lint(&sh)?,
        Commands::Fmt { check } => fmt(&sh, check)?,
        Commands::Clean => cmd!(sh, "cargo clean").run()?,
        Commands::Install => cmd!(sh, "cargo install --path .").run()?,
        Commands::Doc { open } => doc(&sh, open)?,
        Commands::Smoke { stack } => smoke(&sh, &stack)?,
        Commands::Ci => ci(&sh)?,
    }

    Ok(())
}

fn project_root() -> Result<PathBuf> {
    let output = std::process::Command::new("cargo")
        .args(["locate-project", "--workspace", "--message-format=plain"])
        .output()
        .context("Failed to run cargo locate-project")?;

    let path = String::from_utf8(output.stdout)?;
    let manifest = PathBuf::from(path.trim());

    manifest
        .parent()
        .map(|p| p.to_path_buf())
        .context("Failed to find project root")
}

fn build(sh: &Shell, release: bool) -> Result<()> {
    println!("🔨 Building rune-stack...");

    if release {
        cmd!(sh, "cargo build --release --bin rune-stack").run()?;
    } else {
        cmd!(sh, "cargo build --bin rune-stack").run()?;
    }

    println!("✅ Build complete!");
    Ok(())
}

fn test(sh: &Shell, release: bool) -> Result<()> {
    println!("🧪 Running tests...");

    if release {
        cmd!(sh, "cargo test --workspace --release").run()?;
    } else {
        cmd!(sh, "cargo test --workspace").run()?;
    }

    println!("✅ Tests passed!");
    Ok(())
}

fn lint(sh: &Shell) -> Result<()> {
    println!("🔍 Running lints...");

    cmd!(sh, "cargo fmt --all -- --check").run()?;
    cmd!(sh, "cargo clippy --workspace --all-targets -- -D warnings").run()?;

    println!("✅ Lints passed!");
    Ok(())
}

fn fmt(sh: &Shell, check: bool) -> Result<()> {
    if check {
        cmd!(sh, "cargo fmt --all -- --check").run()?;
    } else {
        cmd!(sh, "cargo fmt --all").run()?;
    }
    Ok(())
}

fn doc(sh: &Shell, open: bool) -> Result<()> {
    if open {
        cmd!(sh, "cargo doc --no-deps --open").run()?;
    } else {
        cmd!(sh, "cargo doc --no-deps").run()?;
    }
    Ok(())
}

/// Runs only commands that do not change the swarm
fn smoke(sh: &Shell, stack: &str) -> Result<()> {
    println!("🐳 Checking stack {} on the local swarm...", stack);

    cmd!(sh, "docker node ls --quiet")
        .quiet()
        .run()
        .context("docker is not reachable or this node is not a swarm manager")?;

    let services = cmd!(sh, "cargo run --quiet --bin rune-stack -- stack services {stack}").read()?;
    for service in services.lines().filter(|l| !l.trim().is_empty()) {
        // Exit status 1 only means "not replicated", which is still a valid answer
        cmd!(sh, "cargo run --quiet --bin rune-stack -- service replicated {service}")
            .ignore_status()
            .run()?;
    }

    cmd!(sh, "cargo run --quiet --bin rune-stack -- stack network-exists {stack}")
        .ignore_status()
        .run()?;

    println!("✅ Smoke check complete!");
    Ok(())
}

fn ci(sh: &Shell) -> Result<()> {
    println!("🚀 Running CI checks...");

    lint(sh)?;
    test(sh, false)?;
    build(sh, true)?;

    println!("✅ CI checks passed!");
    Ok(())
}
