//! macOS setup: Homebrew for packages, `~/Library/Application Support` for config.

use std::path::{Path, PathBuf};

use tracing::warn;

use crate::error::{Result, SetupError};
use crate::platform_setup::setup_utils::{
    PlatformAdapter, PlatformPaths, ensure_package_manager, first_existing,
};
use crate::utils::command::CommandRunner;
use crate::utils::dependencies::PackageManager;
use crate::utils::installer::{install_js_runtime_with, install_runtime_with_fallback};

pub const HOMEBREW_INSTALL_COMMAND: &str =
    r#"/bin/bash -c "$(curl -fsSL https://raw.githubusercontent.com/Homebrew/install/HEAD/install.sh)""#;

/// Homebrew bin directories: Apple Silicon first, then Intel.
pub const HOMEBREW_BIN_DIRS: [&str; 2] = ["/opt/homebrew/bin", "/usr/local/bin"];

pub const APPLICATION_PATH: &str = "/Applications/Claude.app";

#[derive(Debug, Default)]
pub struct MacosSetup;

impl MacosSetup {
    pub fn new() -> MacosSetup {
        MacosSetup
    }
}

/// `<home>/Library/Application Support/Claude`
pub fn macos_config_paths(home: &Path) -> PlatformPaths {
    PlatformPaths::under_root(&home.join("Library").join("Application Support"))
}

impl PlatformAdapter for MacosSetup {
    fn name(&self) -> &str {
        "macOS"
    }

    fn package_manager(&self, _runner: &dyn CommandRunner) -> PackageManager {
        PackageManager::Homebrew
    }

    fn install_package_manager(&self, runner: &dyn CommandRunner) -> bool {
        println!("🍺 Installing Homebrew...");
        if runner.run_interactive(HOMEBREW_INSTALL_COMMAND) != 0 {
            println!("❌ Homebrew installation failed");
            return false;
        }

        let candidates: Vec<PathBuf> = HOMEBREW_BIN_DIRS
            .iter()
            .map(|dir| Path::new(dir).to_path_buf())
            .collect();
        match first_existing(&candidates) {
            Some(bin_dir) => runner.prepend_search_path(&bin_dir),
            None => warn!("Homebrew installed but no known bin directory exists"),
        }

        println!("✅ Homebrew installed");
        true
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
        match dirs::home_dir() {
            Some(home) => Ok(macos_config_paths(&home)),
            None => Err(SetupError::NoHomeDirectory),
        }
    }

    fn locate_application(&self) -> Option<PathBuf> {
        first_existing(&[PathBuf::from(APPLICATION_PATH)])
    }
}
