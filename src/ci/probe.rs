//! Empirical check that a failing test makes the e2e runner exit non-zero.
//!
//! The probe writes a test that always fails, runs the project's e2e command
//! on just that file, and reads the exit status. The temporary test is owned
//! by a [`TempTestFile`] guard, so it is removed however the probe ends.

use crate::config::CiConfig;
use crate::errors::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;

pub const FAILING_TEST: &str = r#"
const { test, expect } = require('@playwright/test');

test('TEMP VALIDATION - This test should always fail', async () => {
  expect(true).toBe(false); // Intentional failure
});
"#;

/// A file that is deleted when the guard is dropped.
#[derive(Debug)]
pub struct TempTestFile {
    path: PathBuf,
}

impl TempTestFile {
    pub fn create(path: impl Into<PathBuf>, contents: &str) -> Result<Self> {
        let path = path.into();
        fs::write(&path, contents)?;
        log::debug!("Wrote temporary probe test {}", path.display());
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempTestFile {
    fn drop(&mut self) {
        if self.path.exists() {
            if let Err(e) = fs::remove_file(&self.path) {
                log::warn!(
                    "Failed to remove temporary probe test {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// A command to run from the project root with a time budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeCommand {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
    pub timeout: Duration,
}

impl ProbeCommand {
    /// The configured e2e command with the probe file appended.
    pub fn for_probe(config: &CiConfig, working_dir: &Path) -> Result<Self> {
        let (program, leading) = config
            .e2e_command
            .split_first()
            .ok_or_else(|| Error::config(".testalign.toml", "ci.e2e_command is empty"))?;

        let mut args = leading.to_vec();
        args.push(config.probe_file.to_string_lossy().into_owned());

        Ok(Self {
            program: program.clone(),
            args,
            working_dir: working_dir.to_path_buf(),
            timeout: Duration::from_secs(config.probe_timeout_secs),
        })
    }

    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Exit information of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub exit_code: Option<i32>,
    pub success: bool,
    pub duration_ms: u64,
}

/// Runs probe commands. Implementations must enforce `command.timeout`.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&self, command: &ProbeCommand) -> Result<RunOutput>;
}

/// Runs commands as real subprocesses.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShellRunner;

impl CommandRunner for ShellRunner {
    async fn run(&self, command: &ProbeCommand) -> Result<RunOutput> {
        let start = Instant::now();

        let child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(&command.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        let output = tokio::time::timeout(command.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                Error::Io(std::io::Error::new(
                    std::io::ErrorKind::TimedOut,
                    format!(
                        "`{}` timed out after {} seconds",
                        command.display(),
                        command.timeout.as_secs()
                    ),
                ))
            })??;

        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
        if !output.status.success() {
            log::debug!(
                "Probe stderr: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(RunOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            duration_ms,
        })
    }
}

/// Whether failing tests make the e2e command fail.
///
/// `true` only on positive evidence: the runner exited non-zero on the
/// intentionally failing test. A zero exit, a timeout, or a runner that
/// could not be started all yield `false`.
pub async fn probe_failure_blocking<R: CommandRunner>(
    runner: &R,
    config: &CiConfig,
    project_root: &Path,
) -> bool {
    let command = match ProbeCommand::for_probe(config, project_root) {
        Ok(command) => command,
        Err(e) => {
            log::warn!("Could not test failure blocking: {}", e);
            return false;
        }
    };

    let guard = match TempTestFile::create(project_root.join(&config.probe_file), FAILING_TEST) {
        Ok(guard) => guard,
        Err(e) => {
            log::warn!("Could not test failure blocking: {}", e);
            return false;
        }
    };

    log::info!("Running failure probe: {}", command.display());
    let blocking = match runner.run(&command).await {
        Ok(output) if !output.success => {
            log::debug!(
                "Probe exited with {:?} after {}ms",
                output.exit_code,
                output.duration_ms
            );
            true
        }
        Ok(_) => {
            log::warn!("Intentionally failing test passed; failures do not block");
            false
        }
        Err(e) => {
            log::warn!("Could not test failure blocking: {}", e);
            false
        }
    };

    drop(guard);
    blocking
}
