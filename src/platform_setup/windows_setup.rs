//! Windows setup: winget for packages, `%APPDATA%` for config, and a direct
//! MSI download when winget cannot install Node.js.

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{Result, SetupError};
use crate::platform_setup::setup_utils::{
    PlatformAdapter, PlatformPaths, ensure_package_manager, first_existing,
};
use crate::utils::command::CommandRunner;
use crate::utils::dependencies::PackageManager;
use crate::utils::installer::{download_file, install_runtime_with_fallback};

/// Fixed Node.js LTS installer used when winget is missing or fails.
pub const NODE_INSTALLER_URL: &str = "https://nodejs.org/dist/v20.11.0/node-v20.11.0-x64.msi";

pub const NODE_INSTALLER_FILE_NAME: &str = "nodejs_installer.msi";

#[derive(Debug)]
pub struct WindowsSetup {
    installer_url: String,
    /// Where the MSI lands; `None` when no home directory could be found.
    downloads_dir: Option<PathBuf>,
}

impl Default for WindowsSetup {
    fn default() -> Self {
        WindowsSetup {
            installer_url: NODE_INSTALLER_URL.to_string(),
            downloads_dir: dirs::home_dir().map(|home| home.join("Downloads")),
        }
    }
}

impl WindowsSetup {
    pub fn new() -> WindowsSetup {
        WindowsSetup::default()
    }

    /// Fetch the Node.js installer from `url` into `downloads_dir` instead of the defaults.
    pub fn with_installer_source(mut self, url: impl Into<String>, downloads_dir: impl Into<PathBuf>) -> WindowsSetup {
        self.installer_url = url.into();
        self.downloads_dir = Some(downloads_dir.into());
        self
    }
}

/// `%APPDATA%\Claude`, or `<home>\AppData\Roaming\Claude` when `APPDATA` is unset or empty.
pub fn windows_config_paths(appdata: Option<OsString>, home: Option<PathBuf>) -> Result<PlatformPaths> {
    match appdata.filter(|v| !v.is_empty()) {
        Some(root) => Ok(PlatformPaths::under_root(Path::new(&root))),
        None => match home {
            Some(home) => Ok(PlatformPaths::under_root(&home.join("AppData").join("Roaming"))),
            None => Err(SetupError::NoHomeDirectory),
        },
    }
}

/// Standard install locations of the desktop application, most likely first.
/// Variables that are unset are skipped rather than read as relative paths.
pub fn application_candidates(
    local_appdata: Option<OsString>,
    program_files: Option<OsString>,
    program_files_x86: Option<OsString>,
    home: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();
    if let Some(dir) = local_appdata.filter(|v| !v.is_empty()) {
        candidates.push(Path::new(&dir).join("Programs").join("Claude").join("Claude.exe"));
    }
    for dir in [program_files, program_files_x86].into_iter().flatten() {
        if !dir.is_empty() {
            candidates.push(Path::new(&dir).join("Claude").join("Claude.exe"));
        }
    }
    if let Some(home) = home {
        candidates.push(
            home.join("AppData").join("Local").join("Programs").join("Claude").join("Claude.exe"),
        );
    }
    candidates
}

impl WindowsSetup {
    fn install_js_runtime_winget(&self, runner: &dyn CommandRunner) -> bool {
        println!("📦 Installing Node.js through winget...");
        let cmd = match PackageManager::Winget.install_command(PackageManager::Winget.js_runtime_package()) {
            Some(cmd) => cmd,
            None => return false,
        };
        let output = runner.run(&cmd);
        if !output.success() {
            println!("❌ winget install failed: {}", output.stderr);
            return false;
        }

        // The installer updates the registry PATH only; make node visible to this run.
        let program_files = env::var_os("ProgramFiles").unwrap_or_else(|| OsString::from(r"C:\Program Files"));
        runner.prepend_search_path(&Path::new(&program_files).join("nodejs"));

        println!("✅ Node.js installed");
        println!("⚠️  You may need to restart the terminal to use Node.js");
        true
    }
}

/// Download the MSI from `url` into `downloads_dir` and hand it to the
/// interactive Windows installer.
/// Always `false`: installation finishes outside this run.
pub fn install_js_runtime_direct_from(runner: &dyn CommandRunner, url: &str, downloads_dir: &Path) -> bool {
    let installer = downloads_dir.join(NODE_INSTALLER_FILE_NAME);

    println!("⬇️  Downloading {}...", url);
    if let Err(e) = download_file(url, &installer) {
        println!("❌ Download failed: {}", e);
        return false;
    }
    println!("✅ Installer saved to {}", installer.display());

    println!("🔧 Launching the Node.js installer, follow its instructions");
    let output = runner.run(&installer_launch_command(&installer));
    debug!(exit_code = output.exit_code, "installer launched");

    println!("\n⚠️  IMPORTANT:");
    println!("1. Finish the Node.js installation");
    println!("2. Run this setup again afterwards");
    false
}

/// `start` treats its first quoted argument as the window title, hence the empty one.
pub fn installer_launch_command(installer: &Path) -> String {
    format!("start \"\" \"{}\"", installer.display())
}

impl PlatformAdapter for WindowsSetup {
    fn name(&self) -> &str {
        "Windows"
    }

    fn package_manager(&self, _runner: &dyn CommandRunner) -> PackageManager {
        PackageManager::Winget
    }

    fn install_package_manager(&self, _runner: &dyn CommandRunner) -> bool {
        println!("ℹ️  winget ships with the App Installer from the Microsoft Store");
        false
    }

    fn runtime_version_command(&self) -> &str {
        "python --version"
    }

    fn install_runtime(&self, runner: &dyn CommandRunner) -> bool {
        match ensure_package_manager(self, runner) {
            Some(manager) => install_runtime_with_fallback(runner, manager),
            None => {
                println!("ℹ️  Download Python 3.8+ from https://www.python.org/downloads/");
                false
            }
        }
    }

    fn install_js_runtime(&self, runner: &dyn CommandRunner) -> bool {
        if self.detect_package_manager(runner) {
            println!("📦 winget found, using it to install Node.js...");
            if self.install_js_runtime_winget(runner) {
                return true;
            }
        }
        println!("⚠️  winget unavailable or failed, trying a direct download...");
        match &self.downloads_dir {
            Some(dir) => install_js_runtime_direct_from(runner, &self.installer_url, dir),
            None => {
                println!("❌ Could not locate the Downloads folder");
                false
            }
        }
    }

    fn resolve_config_path(&self) -> Result<PlatformPaths> {
        windows_config_paths(env::var_os("APPDATA"), dirs::home_dir())
    }

    fn locate_application(&self) -> Option<PathBuf> {
        first_existing(&application_candidates(
            env::var_os("LOCALAPPDATA"),
            env::var_os("PROGRAMFILES"),
            env::var_os("PROGRAMFILES(X86)"),
            dirs::home_dir(),
        ))
    }

    fn is_elevated(&self, runner: &dyn CommandRunner) -> Option<bool> {
        // `net session` is refused without administrator rights.
        Some(runner.run("net session").success())
    }

    fn pauses_before_exit(&self) -> bool {
        true
    }
}
