pub mod linux_setup;
pub mod macos_setup;
pub mod setup_utils;
pub mod windows_setup;

use crate::platform_setup::setup_utils::PlatformAdapter;

/// Adapter for the operating system this binary was built for.
pub fn current_platform() -> Box<dyn PlatformAdapter> {
    if cfg!(target_os = "macos") {
        Box::new(macos_setup::MacosSetup::new())
    } else if cfg!(target_os = "windows") {
        Box::new(windows_setup::WindowsSetup::new())
    } else {
        Box::new(linux_setup::LinuxSetup::new())
    }
}
