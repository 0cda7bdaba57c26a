use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::utils::command::CommandRunner;
use crate::utils::dependencies::PackageManager;

/// Directory name the desktop application keeps its settings under.
pub const APP_DIR_NAME: &str = "Claude";

/// File the desktop application reads its plugin servers from.
pub const CONFIG_FILE_NAME: &str = "claude_desktop_config.json";

/// Location of the desktop application's configuration on this machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPaths {
    /// Directory holding the configuration file.
    config_dir: PathBuf,
    /// Full path of the configuration file.
    config_file: PathBuf
}

impl PlatformPaths {
    /// Paths for a configuration kept directly in `config_dir`.
    pub fn in_directory(config_dir: impl Into<PathBuf>) -> PlatformPaths {
        let config_dir = config_dir.into();
        let config_file = config_dir.join(CONFIG_FILE_NAME);
        PlatformPaths { config_dir, config_file }
    }
    /// Paths for the application subdirectory under a per-user data root.
    pub fn under_root(data_root: &Path) -> PlatformPaths {
        PlatformPaths::in_directory(data_root.join(APP_DIR_NAME))
    }
    pub fn get_config_dir(&self) -> &Path {
        &self.config_dir
    }
    pub fn get_config_file(&self) -> &Path {
        &self.config_file
    }
}

/// What one operating system contributes to a setup run.
pub trait PlatformAdapter: Send + Sync {
    /// Human readable platform name for progress output.
    fn name(&self) -> &str;

    /// The package manager this platform installs through.
    fn package_manager(&self, runner: &dyn CommandRunner) -> PackageManager;

    /// Whether that package manager answers its probe.
    fn detect_package_manager(&self, runner: &dyn CommandRunner) -> bool {
        self.package_manager(runner).is_available(runner)
    }

    fn install_package_manager(&self, runner: &dyn CommandRunner) -> bool;

    /// Shell command printing the language runtime version banner.
    fn runtime_version_command(&self) -> &str {
        "python3 --version"
    }

    fn install_runtime(&self, runner: &dyn CommandRunner) -> bool;

    fn install_js_runtime(&self, runner: &dyn CommandRunner) -> bool;

    fn resolve_config_path(&self) -> Result<PlatformPaths>;

    /// Installed desktop application, if found in a standard location.
    fn locate_application(&self) -> Option<PathBuf>;

    /// Elevated-privilege indicator; `None` where it does not apply.
    fn is_elevated(&self, _runner: &dyn CommandRunner) -> Option<bool> {
        None
    }

    /// Whether the terminal should wait for ENTER before closing.
    fn pauses_before_exit(&self) -> bool {
        false
    }
}

/// Make sure the platform package manager is usable, installing it if needed.
pub fn ensure_package_manager(adapter: &dyn PlatformAdapter, runner: &dyn CommandRunner) -> Option<PackageManager> {
    if adapter.detect_package_manager(runner) {
        return Some(adapter.package_manager(runner));
    }
    println!("❌ {} package manager not found, installing it first...", adapter.name());
    if !adapter.install_package_manager(runner) {
        return None;
    }
    if adapter.detect_package_manager(runner) {
        Some(adapter.package_manager(runner))
    } else {
        None
    }
}

/// First candidate that exists on disk.
pub fn first_existing(candidates: &[PathBuf]) -> Option<PathBuf> {
    candidates.iter().find(|p| p.exists()).cloned()
}
