use crate::common::ScriptedRunner;
use mcp_desktop_setup::platform_setup::macos_setup::{HOMEBREW_INSTALL_COMMAND, MacosSetup};
use mcp_desktop_setup::platform_setup::setup_utils::{PlatformAdapter, ensure_package_manager};
use mcp_desktop_setup::utils::dependencies::PackageManager;
use mcp_desktop_setup::utils::installer::{install_js_runtime_with, install_runtime_with_fallback};

fn install_calls(runner: &ScriptedRunner) -> Vec<String> {
    runner.calls_starting_with("brew install")
}

#[test]
fn test_versioned_install_success_needs_no_fallback() {
    let runner = ScriptedRunner::new()
        .respond("brew info python@3.12", 0, "")
        .respond("brew install python@3.12", 0, "")
        .respond("brew link", 0, "");
    assert!(install_runtime_with_fallback(&runner, PackageManager::Homebrew));
    assert_eq!(install_calls(&runner), vec!["brew install python@3.12"]);
    assert_eq!(
        runner.calls_starting_with("brew link"),
        vec!["brew link --overwrite python@3.12"]
    );
}

#[test]
fn test_failed_versioned_install_falls_back_once_to_generic() {
    let runner = ScriptedRunner::new()
        .respond("brew info python@3.12", 0, "")
        .respond("brew install python@3.12", 1, "")
        .respond("brew install python", 0, "");
    assert!(install_runtime_with_fallback(&runner, PackageManager::Homebrew));
    assert_eq!(
        install_calls(&runner),
        vec!["brew install python@3.12", "brew install python"]
    );
}

#[test]
fn test_both_install_attempts_failing_reports_failure() {
    let runner = ScriptedRunner::new()
        .respond("brew info python@3.12", 0, "")
        .respond("brew install", 1, "");
    assert!(!install_runtime_with_fallback(&runner, PackageManager::Homebrew));
    // exactly one fallback, no further retries
    assert_eq!(
        install_calls(&runner),
        vec!["brew install python@3.12", "brew install python"]
    );
    assert!(runner.calls_starting_with("brew link").is_empty());
}

#[test]
fn test_fallback_tag_is_used_for_versioned_package() {
    let runner = ScriptedRunner::new().respond("brew install python@3.11", 0, "");
    assert!(install_runtime_with_fallback(&runner, PackageManager::Homebrew));
    assert_eq!(install_calls(&runner), vec!["brew install python@3.11"]);
}

#[test]
fn test_generic_only_manager_installs_once() {
    let runner = ScriptedRunner::new().respond("sudo pacman", 1, "");
    assert!(!install_runtime_with_fallback(&runner, PackageManager::Pacman));
    assert_eq!(
        runner.calls_starting_with("sudo pacman"),
        vec!["sudo pacman -S --noconfirm python"]
    );
}

#[test]
fn test_unknown_manager_installs_nothing() {
    let runner = ScriptedRunner::new();
    assert!(!install_runtime_with_fallback(&runner, PackageManager::Unknown));
    assert!(!install_js_runtime_with(&runner, PackageManager::Unknown));
    assert!(runner.calls().is_empty());
}

#[test]
fn test_js_runtime_install_is_verified() {
    let runner = ScriptedRunner::new()
        .respond("brew install node", 0, "")
        .respond("node --version", 0, "v22.1.0");
    assert!(install_js_runtime_with(&runner, PackageManager::Homebrew));
    assert_eq!(runner.calls(), vec!["brew install node", "node --version"]);
}

#[test]
fn test_js_runtime_install_without_working_node_fails() {
    let runner = ScriptedRunner::new().respond("brew install node", 0, "");
    assert!(!install_js_runtime_with(&runner, PackageManager::Homebrew));
}

#[test]
fn test_js_runtime_install_command_failure() {
    let runner = ScriptedRunner::new().respond("brew install node", 1, "");
    assert!(!install_js_runtime_with(&runner, PackageManager::Homebrew));
    assert!(runner.calls_starting_with("node").is_empty());
}

#[test]
fn test_missing_homebrew_triggers_its_installer() {
    let runner = ScriptedRunner::new().respond(HOMEBREW_INSTALL_COMMAND, 1, "");
    let adapter = MacosSetup::new();
    assert_eq!(ensure_package_manager(&adapter, &runner), None);
    assert_eq!(runner.calls_starting_with(HOMEBREW_INSTALL_COMMAND).len(), 1);
    assert!(!adapter.install_runtime(&runner));
    assert!(runner.calls_starting_with("brew install").is_empty());
}

#[test]
fn test_homebrew_detected_after_install() {
    let runner = ScriptedRunner::new()
        .respond_seq("which brew", &[(1, ""), (0, "/opt/homebrew/bin/brew")])
        .respond(HOMEBREW_INSTALL_COMMAND, 0, "");
    let adapter = MacosSetup::new();
    assert_eq!(ensure_package_manager(&adapter, &runner), Some(PackageManager::Homebrew));
}
