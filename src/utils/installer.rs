//! Package-manager driven installs shared by every platform.

use std::fs::{File, create_dir_all};
use std::path::Path;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::{Result, SetupError};
use crate::utils::command::CommandRunner;
use crate::utils::dependencies::{PackageManager, find_latest_available_runtime_version, has_js_runtime};

/// Install the language runtime with `manager`.
///
/// Tries the newest versioned package first and, when that install exits
/// non-zero, makes exactly one more attempt with the generic package name.
///
/// # Returns
/// * `true` if either attempt succeeded.
/// * `false` if both failed, or the manager cannot install anything.
pub fn install_runtime_with_fallback(runner: &dyn CommandRunner, manager: PackageManager) -> bool {
    let tag = find_latest_available_runtime_version(runner, manager);
    let generic = manager.generic_runtime_package().to_string();
    let primary = manager.versioned_runtime_package(&tag).unwrap_or_else(|| generic.clone());

    let primary_cmd = match manager.install_command(&primary) {
        Some(cmd) => cmd,
        None => {
            println!("❌ No package manager available to install Python");
            return false;
        }
    };

    println!("📦 Installing Python {} ({})...", tag, primary);
    let output = runner.run(&primary_cmd);
    if !output.success() {
        println!("❌ Python install failed: {}", output.stderr);
        if primary == generic {
            return false;
        }
        println!("🔄 Retrying with the generic '{}' package...", generic);
        let fallback_cmd = match manager.install_command(&generic) {
            Some(cmd) => cmd,
            None => return false,
        };
        let fallback = runner.run(&fallback_cmd);
        if !fallback.success() {
            println!("❌ Generic Python install failed too: {}", fallback.stderr);
            return false;
        }
    }

    // Relink result is ignored; a stale link is not worth failing the run.
    if let Some(relink) = manager.relink_command(&tag) {
        let _ = runner.run(&relink);
    }

    println!("✅ Python installed/updated");
    true
}

/// Install Node.js with `manager` and confirm `node` answers afterwards.
pub fn install_js_runtime_with(runner: &dyn CommandRunner, manager: PackageManager) -> bool {
    let cmd = match manager.install_command(manager.js_runtime_package()) {
        Some(cmd) => cmd,
        None => {
            println!("❌ No package manager available to install Node.js");
            return false;
        }
    };

    println!("📦 Installing Node.js...");
    let output = runner.run(&cmd);
    if !output.success() {
        println!("❌ Node.js install failed: {}", output.stderr);
        return false;
    }

    if has_js_runtime(runner) {
        true
    } else {
        println!("❌ Node.js does not seem to be installed correctly");
        false
    }
}

/// Download `url` into `destination`, creating its parent directory.
pub fn download_file(url: &str, destination: &Path) -> Result<()> {
    if let Some(parent) = destination.parent() {
        if let Err(e) = create_dir_all(parent) {
            return Err(SetupError::io(parent, e));
        }
    }

    let client = Client::new();
    let mut response = match client.get(url).send() {
        Ok(response) => response,
        Err(e) => {
            return Err(SetupError::Download { url: url.to_string(), message: e.to_string() });
        }
    };
    if !response.status().is_success() {
        return Err(SetupError::Download {
            url: url.to_string(),
            message: format!("server answered {}", response.status()),
        });
    }

    let mut file = match File::create(destination) {
        Ok(file) => file,
        Err(e) => return Err(SetupError::io(destination, e)),
    };

    match response.copy_to(&mut file) {
        Ok(bytes) => {
            debug!(url, bytes, "download complete");
            Ok(())
        }
        Err(e) => {
            warn!(url, "download interrupted: {}", e);
            Err(SetupError::Download { url: url.to_string(), message: e.to_string() })
        }
    }
}
