use std::path::PathBuf;

use crate::error::{Result, SetupError};
use crate::platform_setup::setup_utils::{
    PlatformAdapter, PlatformPaths, ensure_package_manager, first_existing,
};
use crate::utils::command::CommandRunner;
use crate::utils::dependencies::PackageManager;
use crate::utils::installer::{install_js_runtime_with, install_runtime_with_fallback};

#[derive(Debug, Default)]
pub struct LinuxSetup;

impl LinuxSetup {
    pub fn new() -> LinuxSetup {
        LinuxSetup
    }
}

impl PlatformAdapter for LinuxSetup {
    fn name(&self) -> &str {
        "Linux"
    }

    fn package_manager(&self, runner: &dyn CommandRunner) -> PackageManager {
        PackageManager::detect(runner)
    }

    fn detect_package_manager(&self, runner: &dyn CommandRunner) -> bool {
        // detect() already probed every candidate
        self.package_manager(runner) != PackageManager::Unknown
    }

    fn install_package_manager(&self, _runner: &dyn CommandRunner) -> bool {
        println!("❌ No supported package manager (apt-get, dnf, yum, zypper, pacman) found");
        false
    }

    fn install_runtime(&self, runner: &dyn CommandRunner) -> bool {
        println!("🐍 Installing/updating Python...");
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
        match dirs::config_dir() {
            Some(root) => Ok(PlatformPaths::under_root(&root)),
            None => Err(SetupError::NoHomeDirectory),
        }
    }

    fn locate_application(&self) -> Option<PathBuf> {
        let mut candidates = vec![
            PathBuf::from("/usr/bin/claude-desktop"),
            PathBuf::from("/opt/Claude/claude-desktop"),
        ];
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".local").join("bin").join("claude-desktop"));
        }
        first_existing(&candidates)
    }
}
