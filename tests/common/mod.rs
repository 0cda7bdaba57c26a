#![allow(dead_code)]

use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use mcp_desktop_setup::error::Result;
use mcp_desktop_setup::platform_setup::setup_utils::{PlatformAdapter, PlatformPaths, ensure_package_manager};
use mcp_desktop_setup::utils::command::{CommandOutput, CommandRunner};
use mcp_desktop_setup::utils::dependencies::PackageManager;
use mcp_desktop_setup::utils::installer::{install_js_runtime_with, install_runtime_with_fallback};

pub const NOT_FOUND_EXIT_CODE: i32 = 127;

struct Rule {
    prefix: String,
    outputs: VecDeque<CommandOutput>,
}

/// Runner answering from a script instead of spawning processes.
///
/// A command is matched against the rules in registration order by prefix.
/// A rule with several outputs hands them out one per call and then keeps
/// repeating the last one. Unmatched commands exit 127.
#[derive(Default)]
pub struct ScriptedRunner {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<String>>,
    search_path: Mutex<Vec<PathBuf>>,
}

pub fn output(exit_code: i32, stdout: &str) -> CommandOutput {
    CommandOutput {
        stdout: stdout.to_string(),
        stderr: if exit_code == 0 { String::new() } else { format!("exit {}", exit_code) },
        exit_code,
    }
}

impl ScriptedRunner {
    pub fn new() -> ScriptedRunner {
        ScriptedRunner::default()
    }

    pub fn respond(self, prefix: &str, exit_code: i32, stdout: &str) -> ScriptedRunner {
        self.respond_seq(prefix, &[(exit_code, stdout)])
    }

    pub fn respond_seq(self, prefix: &str, outputs: &[(i32, &str)]) -> ScriptedRunner {
        self.rules.lock().unwrap().push(Rule {
            prefix: prefix.to_string(),
            outputs: outputs.iter().map(|(code, out)| output(*code, out)).collect(),
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_starting_with(&self, prefix: &str) -> Vec<String> {
        self.calls().into_iter().filter(|c| c.starts_with(prefix)).collect()
    }

    pub fn search_path(&self) -> Vec<PathBuf> {
        self.search_path.lock().unwrap().clone()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &str) -> CommandOutput {
        self.calls.lock().unwrap().push(command.to_string());
        let mut rules = self.rules.lock().unwrap();
        for rule in rules.iter_mut() {
            if command.starts_with(&rule.prefix) {
                if rule.outputs.len() > 1 {
                    return rule.outputs.pop_front().unwrap();
                }
                return rule.outputs[0].clone();
            }
        }
        output(NOT_FOUND_EXIT_CODE, "")
    }

    fn run_interactive(&self, command: &str) -> i32 {
        self.run(command).exit_code
    }

    fn prepend_search_path(&self, dir: &Path) {
        self.search_path.lock().unwrap().insert(0, dir.to_path_buf());
    }
}

/// Shares a [`ScriptedRunner`] between a test and the code under test.
pub struct SharedRunner(pub std::sync::Arc<ScriptedRunner>);

impl CommandRunner for SharedRunner {
    fn run(&self, command: &str) -> CommandOutput {
        self.0.run(command)
    }

    fn run_interactive(&self, command: &str) -> i32 {
        self.0.run_interactive(command)
    }

    fn prepend_search_path(&self, dir: &Path) {
        self.0.prepend_search_path(dir)
    }
}

/// Homebrew-based adapter with a configurable application location.
pub struct FakeAdapter {
    pub application: Option<PathBuf>,
    pub config_root: PathBuf,
}

impl PlatformAdapter for FakeAdapter {
    fn name(&self) -> &str {
        "Test"
    }

    fn package_manager(&self, _runner: &dyn CommandRunner) -> PackageManager {
        PackageManager::Homebrew
    }

    fn install_package_manager(&self, _runner: &dyn CommandRunner) -> bool {
        false
    }

    fn install_runtime(&self, runner: &dyn CommandRunner) -> bool {
        match ensure_package_manager(self, runner) {
            Some(manager) => install_runtime_with_fallback(runner, manager),
            None => false,
        }
    }

    fn install_js_runtime(&self, runner: &dyn CommandRunner) -> bool {
        match ensure_package_manager(self, runner) {
            Some(manager) => install_js_runtime_with(runner, manager),
            None => false,
        }
    }

    fn resolve_config_path(&self) -> Result<PlatformPaths> {
        Ok(PlatformPaths::under_root(&self.config_root))
    }

    fn locate_application(&self) -> Option<PathBuf> {
        self.application.clone()
    }
}
