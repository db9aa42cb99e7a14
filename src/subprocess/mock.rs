//! Scripted stand-in for ffmpeg and ffprobe
//!
//! Each script answers calls to one program, optionally only when a given
//! argument is present. Like the real tools, a script can write the output
//! file named by the command's last argument.

use async_trait::async_trait;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::error::ProcessError;
use super::runner::{ExitStatus, ProcessCommand, ProcessOutput, ProcessRunner};

/// Process runner that replays scripted responses and records every command
#[derive(Clone, Default)]
pub struct MockProcessRunner {
    scripts: Arc<Mutex<Vec<Script>>>,
    calls: Arc<Mutex<Vec<ProcessCommand>>>,
}

struct Script {
    program: String,
    required_arg: Option<String>,
    output: ProcessOutput,
    remaining: Option<usize>,
    output_contents: Option<Vec<u8>>,
}

impl Script {
    fn answers(&self, command: &ProcessCommand) -> bool {
        self.program == command.program
            && self.remaining != Some(0)
            && self
                .required_arg
                .as_ref()
                .map_or(true, |arg| command.args.contains(arg))
    }
}

/// Builder for one scripted response; registered by [`ScriptedCommand::finish`]
pub struct ScriptedCommand {
    runner: MockProcessRunner,
    script: Script,
}

impl MockProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful, silent response for `program`
    pub fn expect_command(&self, program: &str) -> ScriptedCommand {
        ScriptedCommand {
            runner: self.clone(),
            script: Script {
                program: program.to_string(),
                required_arg: None,
                output: ProcessOutput {
                    status: ExitStatus::Success,
                    stdout: String::new(),
                    stderr: String::new(),
                    duration: Duration::from_millis(5),
                },
                remaining: None,
                output_contents: None,
            },
        }
    }

    pub fn call_count(&self, program: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|cmd| cmd.program == program)
            .count()
    }

    pub fn verify_called(&self, program: &str, times: usize) -> bool {
        self.call_count(program) == times
    }

    pub fn get_call_history(&self) -> Vec<ProcessCommand> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProcessRunner for MockProcessRunner {
    async fn run(&self, command: ProcessCommand) -> Result<ProcessOutput, ProcessError> {
        self.calls.lock().unwrap().push(command.clone());

        let (output, contents) = {
            let mut scripts = self.scripts.lock().unwrap();
            let script = scripts
                .iter_mut()
                .find(|script| script.answers(&command))
                .ok_or_else(|| ProcessError::Unscripted(command.display()))?;
            if let Some(remaining) = script.remaining.as_mut() {
                *remaining -= 1;
            }
            (script.output.clone(), script.output_contents.clone())
        };

        if let (Some(contents), Some(target)) = (contents, command.args.last()) {
            if output.status.success() {
                tokio::fs::write(Path::new(target), contents).await?;
            }
        }
        Ok(output)
    }
}

impl ScriptedCommand {
    /// Only answer commands that carry this exact argument
    pub fn with_arg(mut self, arg: &str) -> Self {
        self.script.required_arg = Some(arg.to_string());
        self
    }

    pub fn returns_stdout(mut self, stdout: &str) -> Self {
        self.script.output.stdout = stdout.to_string();
        self
    }

    /// Exit with `code` and print `stderr`, as a failing encode would
    pub fn fails_with(mut self, code: i32, stderr: &str) -> Self {
        self.script.output.status = ExitStatus::Error(code);
        self.script.output.stderr = stderr.to_string();
        self
    }

    /// On success, write `contents` to the output path (the last argument)
    pub fn writes_output(mut self, contents: &[u8]) -> Self {
        self.script.output_contents = Some(contents.to_vec());
        self
    }

    /// Answer at most `n` calls; later calls fall through to other scripts
    pub fn times(mut self, n: usize) -> Self {
        self.script.remaining = Some(n);
        self
    }

    pub fn finish(self) {
        self.runner.scripts.lock().unwrap().push(self.script);
    }
}
