use std::path::Path;

use crate::common::ScriptedRunner;
use mcp_desktop_setup::platform_setup::current_platform;
use mcp_desktop_setup::platform_setup::linux_setup::LinuxSetup;
use mcp_desktop_setup::platform_setup::macos_setup::{MacosSetup, macos_config_paths};
use mcp_desktop_setup::platform_setup::setup_utils::PlatformAdapter;
use mcp_desktop_setup::utils::dependencies::PackageManager;

#[test]
fn test_macos_config_location() {
    let paths = macos_config_paths(Path::new("/Users/ada"));
    assert_eq!(
        paths.get_config_dir(),
        Path::new("/Users/ada/Library/Application Support/Claude")
    );
    assert_eq!(
        paths.get_config_file(),
        Path::new("/Users/ada/Library/Application Support/Claude/claude_desktop_config.json")
    );
}

#[test]
fn test_unix_adapters_have_no_elevation_check() {
    let runner = ScriptedRunner::new();
    assert_eq!(MacosSetup::new().is_elevated(&runner), None);
    assert_eq!(LinuxSetup::new().is_elevated(&runner), None);
    assert!(runner.calls().is_empty());
    assert!(!MacosSetup::new().pauses_before_exit());
}

#[test]
fn test_linux_adapter_uses_detected_manager() {
    let adapter = LinuxSetup::new();
    let runner = ScriptedRunner::new().respond("zypper --version", 0, "zypper 1.14.68");
    assert_eq!(adapter.package_manager(&runner), PackageManager::Zypper);
    assert!(adapter.detect_package_manager(&runner));

    let bare = ScriptedRunner::new();
    assert!(!adapter.detect_package_manager(&bare));
    assert!(!adapter.install_js_runtime(&bare));
}

#[cfg(target_os = "linux")]
#[test]
fn test_current_platform_on_linux() {
    assert_eq!(current_platform().name(), "Linux");
}

#[cfg(target_os = "macos")]
#[test]
fn test_current_platform_on_macos() {
    assert_eq!(current_platform().name(), "macOS");
}

#[cfg(target_os = "windows")]
#[test]
fn test_current_platform_on_windows() {
    assert_eq!(current_platform().name(), "Windows");
}
