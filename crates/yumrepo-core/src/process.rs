use std::{
    collections::BTreeMap,
    process::{Command, Stdio},
};

use tracing::debug;

use crate::{error::YumError, YumResult};

/// Captured result of a finished child process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, or `-1` when the process was terminated by a signal.
    pub return_code: i32,
    pub stdout: Vec<String>,
    pub stderr: Vec<String>,
}

impl ProcessOutput {
    pub fn is_success(&self) -> bool {
        self.return_code == 0
    }

    pub fn has_stderr(&self) -> bool {
        !self.stderr.is_empty()
    }

    pub fn stderr_as_string(&self) -> String {
        format!("Error Message: {}", self.stderr.join("\n"))
    }
}

/// Runs external commands synchronously.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }

    /// Spawns `command` with `env` layered over the inherited environment and
    /// waits for it to exit.
    ///
    /// Both output streams are drained completely before returning and every
    /// handle is dropped on return. A non-zero exit code is reported in the
    /// output, not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`YumError::ProcessLaunch`] if `command` is empty or the program
    /// cannot be started.
    pub fn execute(
        &self,
        command: &[String],
        env: &BTreeMap<String, String>,
    ) -> YumResult<ProcessOutput> {
        let Some((program, args)) = command.split_first() else {
            return Err(YumError::ProcessLaunch("Cannot run empty command".into()));
        };

        debug!("launching {} with {} argument(s)", program, args.len());

        let output = Command::new(program)
            .args(args)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|err| {
                YumError::ProcessLaunch(format!("Cannot run program \"{program}\": {err}"))
            })?;

        let return_code = output.status.code().unwrap_or(-1);
        debug!("{} exited with code {}", program, return_code);

        Ok(ProcessOutput {
            return_code,
            stdout: into_lines(&output.stdout),
            stderr: into_lines(&output.stderr),
        })
    }
}

fn into_lines(bytes: &[u8]) -> Vec<String> {
    String::from_utf8_lossy(bytes)
        .lines()
        .map(String::from)
        .collect()
}
