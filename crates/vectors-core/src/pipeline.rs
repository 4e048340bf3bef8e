//! Fail-fast step sequencing
//!
//! A [`Pipeline`] runs its steps strictly in order and stops at the first
//! failure. Nothing already produced is cleaned up and nothing is retried.

use crate::error::FixtureError;
use crate::runner::{run_checked, ToolInvocation, ToolRunner};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// How a captured tool's stdout is turned into file contents
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputDecoding {
    /// Write stdout as-is
    Raw,
    /// Stdout is a plain hex dump; decode it (`xxd -p -r`)
    Hex,
}

/// One pipeline step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Run a tool that writes its own output file
    Run(ToolInvocation),
    /// Run a tool and write its (decoded) stdout to `output`
    Capture {
        tool: ToolInvocation,
        output: PathBuf,
        decoding: OutputDecoding,
    },
    /// Delete an intermediate file
    Remove(PathBuf),
    /// Move `from` into `to_dir`, keeping the file name
    Relocate { from: PathBuf, to_dir: PathBuf },
}

impl Step {
    /// Shell-like rendering used by `plan` and `--dry-run`
    pub fn describe(&self) -> String {
        match self {
            Step::Run(tool) => tool.to_string(),
            Step::Capture {
                tool,
                output,
                decoding,
            } => match decoding {
                OutputDecoding::Raw => format!("{tool} > {}", output.display()),
                OutputDecoding::Hex => format!("{tool} | xxd -p -r > {}", output.display()),
            },
            Step::Remove(path) => format!("rm {}", path.display()),
            Step::Relocate { from, to_dir } => {
                format!("mv {} {}", from.display(), to_dir.display())
            }
        }
    }
}

/// Ordered list of steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn then(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn describe(&self) -> Vec<String> {
        self.steps.iter().map(Step::describe).collect()
    }

    /// Final locations of every relocated file
    pub fn artifacts(&self) -> Vec<PathBuf> {
        self.steps
            .iter()
            .filter_map(|step| match step {
                Step::Relocate { from, to_dir } => from.file_name().map(|name| to_dir.join(name)),
                _ => None,
            })
            .collect()
    }

    /// Execute every step in order, stopping at the first error.
    ///
    /// Returns the final paths of the relocated artifacts.
    pub fn execute(&self, runner: &dyn ToolRunner) -> Result<Vec<PathBuf>, FixtureError> {
        let mut produced = Vec::new();
        for step in &self.steps {
            info!("{}", step.describe());
            match step {
                Step::Run(tool) => {
                    run_checked(runner, tool)?;
                }
                Step::Capture {
                    tool,
                    output,
                    decoding,
                } => {
                    let result = run_checked(runner, tool)?;
                    let bytes = match decoding {
                        OutputDecoding::Raw => result.stdout,
                        OutputDecoding::Hex => decode_hex_dump(&result.stdout).map_err(|source| {
                            FixtureError::HexDecode {
                                program: tool.program.clone(),
                                source,
                            }
                        })?,
                    };
                    std::fs::write(output, bytes).map_err(|e| FixtureError::io(output, e))?;
                }
                Step::Remove(path) => {
                    std::fs::remove_file(path).map_err(|e| FixtureError::io(path, e))?;
                }
                Step::Relocate { from, to_dir } => {
                    produced.push(relocate(from, to_dir)?);
                }
            }
        }
        Ok(produced)
    }
}

/// Decode a plain hex dump, ignoring whitespace and line breaks.
pub fn decode_hex_dump(raw: &[u8]) -> Result<Vec<u8>, hex::FromHexError> {
    let digits: Vec<u8> = raw
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    hex::decode(digits)
}

/// Move `from` into the existing directory `to_dir`, replacing any file of
/// the same name. Falls back to copy + remove across filesystems.
pub fn relocate(from: &Path, to_dir: &Path) -> Result<PathBuf, FixtureError> {
    if !to_dir.is_dir() {
        return Err(FixtureError::MissingDirectory {
            path: to_dir.to_path_buf(),
        });
    }
    let name = from.file_name().ok_or_else(|| {
        FixtureError::io(
            from,
            io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"),
        )
    })?;
    let dest = to_dir.join(name);

    match std::fs::rename(from, &dest) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            std::fs::copy(from, &dest).map_err(|e| FixtureError::io(&dest, e))?;
            std::fs::remove_file(from).map_err(|e| FixtureError::io(from, e))?;
        }
        Err(e) => return Err(FixtureError::io(from, e)),
    }
    Ok(dest)
}
