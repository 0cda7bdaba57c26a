//! Shell command execution.
//!
//! Every probe and installer goes through a [`CommandRunner`], so the rest of
//! the crate never touches `std::process` directly and tests can swap in a
//! scripted runner.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{Result, SetupError};

/// Exit code reported when the process could not be spawned at all.
pub const SPAWN_FAILURE_EXIT_CODE: i32 = -1;

/// Captured result of one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

pub trait CommandRunner: Send + Sync {
    /// Run `command` through the platform shell and capture its output.
    /// A non-zero exit code is returned, never raised.
    fn run(&self, command: &str) -> CommandOutput;

    /// Run `command` with the terminal attached (installers that prompt).
    /// Returns the exit code.
    fn run_interactive(&self, command: &str) -> i32;

    /// Prepend `dir` to the `PATH` seen by every child spawned afterwards.
    /// The current process environment is left untouched.
    fn prepend_search_path(&self, dir: &Path);

    /// Must-succeed variant of [`CommandRunner::run`].
    fn run_checked(&self, command: &str) -> Result<CommandOutput> {
        let output = self.run(command);
        if output.exit_code == SPAWN_FAILURE_EXIT_CODE {
            return Err(SetupError::Spawn {
                command: command.to_string(),
                message: output.stderr,
            });
        }
        if !output.success() {
            return Err(SetupError::CommandFailed {
                command: command.to_string(),
                exit_code: output.exit_code,
                stderr: output.stderr,
            });
        }
        Ok(output)
    }
}

/// Runner backed by real child processes.
#[derive(Debug, Default)]
pub struct SystemRunner {
    search_path_prefixes: Mutex<Vec<PathBuf>>,
}

impl SystemRunner {
    pub fn new() -> SystemRunner {
        SystemRunner::default()
    }

    /// The `PATH` value handed to children, or `None` when nothing was prepended.
    pub fn effective_search_path(&self) -> Option<OsString> {
        let prefixes = match self.search_path_prefixes.lock() {
            Ok(p) => p.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        if prefixes.is_empty() {
            return None;
        }
        let current = env::var_os("PATH").unwrap_or_default();
        let mut dirs = prefixes;
        dirs.extend(env::split_paths(&current));
        match env::join_paths(dirs) {
            Ok(joined) => Some(joined),
            Err(e) => {
                warn!("could not build search path: {}", e);
                None
            }
        }
    }

    fn shell_command(&self, command: &str) -> Command {
        let mut cmd = platform_shell(command);
        if let Some(path) = self.effective_search_path() {
            cmd.env("PATH", path);
        }
        cmd
    }
}

/// cmd.exe does not understand the `\"` escapes std applies to a quoted
/// argument, so the command line goes through untouched.
#[cfg(windows)]
fn platform_shell(command: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut cmd = Command::new("cmd");
    cmd.arg("/C").raw_arg(command);
    cmd
}

#[cfg(not(windows))]
fn platform_shell(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.args(["-c", command]);
    cmd
}

impl CommandRunner for SystemRunner {
    fn run(&self, command: &str) -> CommandOutput {
        debug!(command, "running command");
        match self.shell_command(command).stdin(Stdio::null()).output() {
            Ok(output) => {
                let result = CommandOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
                    // Killed by a signal: no code, count it as a failure.
                    exit_code: output.status.code().unwrap_or(1),
                };
                debug!(command, exit_code = result.exit_code, "command finished");
                result
            }
            Err(e) => {
                warn!(command, "failed to spawn: {}", e);
                CommandOutput {
                    stdout: String::new(),
                    stderr: e.to_string(),
                    exit_code: SPAWN_FAILURE_EXIT_CODE,
                }
            }
        }
    }

    fn run_interactive(&self, command: &str) -> i32 {
        debug!(command, "running interactive command");
        match self.shell_command(command).status() {
            Ok(status) => status.code().unwrap_or(1),
            Err(e) => {
                warn!(command, "failed to spawn: {}", e);
                SPAWN_FAILURE_EXIT_CODE
            }
        }
    }

    fn prepend_search_path(&self, dir: &Path) {
        let mut prefixes = match self.search_path_prefixes.lock() {
            Ok(p) => p,
            Err(poisoned) => poisoned.into_inner(),
        };
        if !prefixes.iter().any(|p| p == dir) {
            debug!(dir = %dir.display(), "prepending to search path");
            prefixes.insert(0, dir.to_path_buf());
        }
    }
}
