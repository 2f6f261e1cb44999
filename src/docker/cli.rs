//! docker command execution

use crate::error::{Result, StackError};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::debug;

/// Captured result of one docker invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None when killed by a signal)
    pub code: Option<i32>,
    /// Raw stdout
    pub stdout: Vec<u8>,
    /// Raw stderr
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    /// Successful output with the given stdout
    pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    /// Failed output with the given exit code and stderr
    pub fn failed(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Trimmed stdout, or None when it is empty or not UTF-8
    pub fn stdout_text(&self) -> Option<String> {
        decode(&self.stdout)
    }

    /// Trimmed stderr, empty when missing or not UTF-8
    pub fn stderr_text(&self) -> String {
        decode(&self.stderr).unwrap_or_default()
    }

    /// Non-empty stdout lines; empty when stdout cannot be decoded
    pub fn stdout_lines(&self) -> Vec<String> {
        self.stdout_text()
            .map(|text| {
                text.lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn decode(bytes: &[u8]) -> Option<String> {
    let text = std::str::from_utf8(bytes).ok()?.trim();
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Something that can run a docker command line
pub trait CommandRunner {
    /// Run docker with `args` and capture its output.
    ///
    /// A nonzero exit is not an error at this level; callers decide with
    /// [`ensure_success`].
    fn run(&self, args: &[&str]) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        (**self).run(args)
    }
}

/// Runs the real docker binary
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: PathBuf,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl DockerCli {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl CommandRunner for DockerCli {
    fn run(&self, args: &[&str]) -> Result<CommandOutput> {
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let output = Command::new(&self.binary).args(args).output()?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Turn a failed invocation into an error carrying `context`.
///
/// docker reports missing objects on stderr with a nonzero exit, so those
/// become [`StackError::NotFound`]; everything else is an operation failure.
pub fn ensure_success(context: &str, output: &CommandOutput) -> Result<()> {
    if output.success() {
        return Ok(());
    }

    let stderr = output.stderr_text();
    if is_not_found_message(&stderr) {
        return Err(StackError::NotFound(format!("{}: {}", context, stderr)));
    }

    let code = output
        .code
        .map(|c| c.to_string())
        .unwrap_or_else(|| "signal".to_string());

    Err(StackError::Operation(if stderr.is_empty() {
        format!("{} (exit {})", context, code)
    } else {
        format!("{} (exit {}): {}", context, code, stderr)
    }))
}

/// Object kinds docker names when it cannot find one
const MISSING_OBJECT_KINDS: &[&str] = &[
    "object",
    "service",
    "network",
    "task",
    "node",
    "container",
    "stack",
];

/// Matches "No such <kind>: <name>" and "<kind> <name> not found"
fn is_not_found_message(stderr: &str) -> bool {
    stderr.lines().any(|line| {
        let line = line.to_lowercase();

        if MISSING_OBJECT_KINDS
            .iter()
            .any(|kind| line.contains(&format!("no such {}", kind)))
        {
            return true;
        }

        match line.find(" not found") {
            Some(idx) => {
                let mut words = line[..idx].split_whitespace().rev();
                let _name = words.next();
                words
                    .next()
                    .map(|kind| MISSING_OBJECT_KINDS.contains(&kind))
                    .unwrap_or(false)
            }
            None => false,
        }
    })
}
