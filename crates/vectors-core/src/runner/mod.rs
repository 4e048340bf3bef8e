//! External tool invocation
//!
//! Every call to `cocli`, `evcli`, `go-psa` or `go-cose-cli` goes through a
//! [`ToolRunner`]. [`run_checked`] is the single place a non-zero exit status
//! becomes a [`FixtureError::ToolFailed`].

mod system;

#[cfg(test)]
pub mod mock;

pub use system::SystemRunner;

use crate::error::FixtureError;
use std::fmt;
use std::path::{Path, PathBuf};

/// A single blocking invocation of an external program
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub program: String,
    pub args: Vec<String>,
    /// Working directory; `None` inherits the caller's
    pub cwd: Option<PathBuf>,
    /// File connected to the child's stdin
    pub stdin: Option<PathBuf>,
}

impl ToolInvocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdin: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn cwd(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn stdin_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    /// Resolve a path relative to this invocation's working directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.cwd {
            Some(cwd) if path.is_relative() => cwd.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        if let Some(stdin) = &self.stdin {
            write!(f, " < {}", stdin.display())?;
        }
        Ok(())
    }
}

/// Captured result of a finished invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code; `None` when the process was terminated by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external programs to completion
pub trait ToolRunner {
    /// Run `invocation`, blocking until it exits.
    ///
    /// Returns `Err` only when the program could not be started. A non-zero
    /// exit is reported through [`ToolOutput::code`].
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, FixtureError>;
}

/// Run `invocation` and require a zero exit status.
pub fn run_checked(
    runner: &dyn ToolRunner,
    invocation: &ToolInvocation,
) -> Result<ToolOutput, FixtureError> {
    let output = runner.run(invocation)?;
    if !output.success() {
        return Err(FixtureError::ToolFailed {
            program: invocation.program.clone(),
            code: output.code,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(output)
}
