//! Mock tool runner for testing

use super::{ToolInvocation, ToolOutput, ToolRunner};
use crate::error::FixtureError;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// File a mocked tool leaves behind on success
#[derive(Debug, Clone)]
pub enum MockFile {
    /// Write `contents` to a fixed path (relative paths resolve against the cwd)
    Fixed { path: PathBuf, contents: Vec<u8> },
    /// Write `contents` to the value of the first argument starting with `prefix`,
    /// e.g. `--token=` for `evcli psa create`
    FromArg { prefix: String, contents: Vec<u8> },
    /// Write `<stem>.cbor` for a `--template=<dir>/<stem>.json` argument, the
    /// way `cocli comid create` and `cocli corim create` name their output
    TemplateStem { contents: Vec<u8> },
}

#[derive(Debug, Clone, Default)]
struct MockResponse {
    output: ToolOutput,
    files: Vec<MockFile>,
}

/// Mock runner. Records invocations and replays canned per-program results.
///
/// Programs without a configured response exit 0 with empty output.
#[derive(Debug, Clone, Default)]
pub struct MockToolRunner {
    responses: Arc<Mutex<HashMap<String, MockResponse>>>,
    /// Track calls for verification
    pub call_log: Arc<Mutex<Vec<ToolInvocation>>>,
}

impl MockToolRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the output `program` returns.
    pub fn respond(&self, program: &str, output: ToolOutput) {
        self.responses
            .lock()
            .unwrap()
            .entry(program.to_string())
            .or_default()
            .output = output;
    }

    /// Make `program` exit 0 and print `stdout`.
    pub fn stdout(&self, program: &str, stdout: impl Into<Vec<u8>>) {
        self.respond(program, ToolOutput {
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        });
    }

    /// Make `program` exit with `code`.
    pub fn fail(&self, program: &str, code: i32, stderr: &str) {
        self.respond(program, ToolOutput {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.as_bytes().to_vec(),
        });
    }

    /// Have `program` create a file when it succeeds.
    pub fn writes(&self, program: &str, file: MockFile) {
        let mut responses = self.responses.lock().unwrap();
        let response = responses.entry(program.to_string()).or_insert_with(|| MockResponse {
            output: ToolOutput {
                code: Some(0),
                ..Default::default()
            },
            files: Vec::new(),
        });
        response.files.push(file);
    }

    /// Get a copy of the call log for assertions
    pub fn get_calls(&self) -> Vec<ToolInvocation> {
        self.call_log.lock().unwrap().clone()
    }

    /// Programs invoked, in order
    pub fn programs(&self) -> Vec<String> {
        self.get_calls().into_iter().map(|c| c.program).collect()
    }
}

fn materialize(invocation: &ToolInvocation, file: &MockFile) -> Option<(PathBuf, Vec<u8>)> {
    match file {
        MockFile::Fixed { path, contents } => Some((invocation.resolve(path), contents.clone())),
        MockFile::FromArg { prefix, contents } => invocation
            .args
            .iter()
            .find_map(|arg| arg.strip_prefix(prefix.as_str()))
            .map(|value| (invocation.resolve(Path::new(value)), contents.clone())),
        MockFile::TemplateStem { contents } => invocation
            .args
            .iter()
            .find_map(|arg| arg.strip_prefix("--template="))
            .and_then(|template| Path::new(template).file_stem().map(PathBuf::from))
            .map(|stem| {
                let name = stem.with_extension("cbor");
                (invocation.resolve(&name), contents.clone())
            }),
    }
}

impl ToolRunner for MockToolRunner {
    fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput, FixtureError> {
        self.call_log.lock().unwrap().push(invocation.clone());

        let response = self
            .responses
            .lock()
            .unwrap()
            .get(&invocation.program)
            .cloned()
            .unwrap_or_else(|| MockResponse {
                output: ToolOutput {
                    code: Some(0),
                    ..Default::default()
                },
                files: Vec::new(),
            });

        if response.output.success() {
            for file in &response.files {
                if let Some((path, contents)) = materialize(invocation, file) {
                    std::fs::write(&path, contents).map_err(|e| FixtureError::io(&path, e))?;
                }
            }
        }

        Ok(response.output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_unconfigured_program_succeeds() {
        let runner = MockToolRunner::new();
        let output = runner.run(&ToolInvocation::new("anything")).unwrap();
        assert!(output.success());
        assert_eq!(runner.programs(), vec!["anything".to_string()]);
    }

    #[test]
    fn test_template_stem_file() {
        let temp = TempDir::new().unwrap();
        let runner = MockToolRunner::new();
        runner.writes("cocli", MockFile::TemplateStem {
            contents: b"comid".to_vec(),
        });

        let inv = ToolInvocation::new("cocli")
            .args(["comid", "create", "--template=/t/data/templates/comid-psa-refval.json"])
            .cwd(temp.path());
        runner.run(&inv).unwrap();

        assert_eq!(
            std::fs::read(temp.path().join("comid-psa-refval.cbor")).unwrap(),
            b"comid"
        );
    }

    #[test]
    fn test_failed_program_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let runner = MockToolRunner::new();
        runner.writes("evcli", MockFile::FromArg {
            prefix: "--token=".to_string(),
            contents: b"token".to_vec(),
        });
        runner.fail("evcli", 1, "boom");

        let inv = ToolInvocation::new("evcli")
            .arg("--token=out.cbor")
            .cwd(temp.path());
        let output = runner.run(&inv).unwrap();

        assert!(!output.success());
        assert!(!temp.path().join("out.cbor").exists());
    }
}
