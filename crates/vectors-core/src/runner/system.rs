//! Runner backed by `std::process::Command`

use super::{ToolInvocation, ToolOutput, ToolRunner};
use crate::error::FixtureError;
use std::fs::File;
use std::process::{Command, Stdio};
use tracing::debug;

/// Spawns real processes and waits for them
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl ToolRunner for SystemRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, FixtureError> {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);

        if let Some(cwd) = &invocation.cwd {
            command.current_dir(cwd);
        }

        match &invocation.stdin {
            Some(path) => {
                let file = File::open(path).map_err(|e| FixtureError::io(path, e))?;
                command.stdin(Stdio::from(file));
            }
            None => {
                command.stdin(Stdio::null());
            }
        }

        let output = command.output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FixtureError::ToolNotFound {
                    program: invocation.program.clone(),
                }
            } else {
                FixtureError::Spawn {
                    program: invocation.program.clone(),
                    source: e,
                }
            }
        })?;

        debug!(
            program = %invocation.program,
            code = ?output.status.code(),
            stdout_bytes = output.stdout.len(),
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "tool exited"
        );

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}
