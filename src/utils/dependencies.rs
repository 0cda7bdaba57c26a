use tracing::debug;

use crate::utils::command::CommandRunner;

/// Minimum supported language runtime, as (major, minor).
pub const MIN_RUNTIME_VERSION: (u32, u32) = (3, 8);

/// Runtime tag queried first when picking a version to install.
pub const PREFERRED_RUNTIME_TAG: &str = "3.12";

/// Older tags tried in order when the preferred one is not available.
pub const FALLBACK_RUNTIME_TAGS: [&str; 3] = ["3.11", "3.10", "3.9"];

/// Tag used when the package manager could not confirm any version.
pub const DEFAULT_RUNTIME_TAG: &str = "3.11";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageManager {
    Homebrew,
    Winget,
    APT,
    DNF,
    YUM,
    Zypper,
    Pacman,
    Unknown
}

impl PackageManager {
    pub fn as_str(&self) -> &str {
        match self {
            PackageManager::Homebrew => "brew",
            PackageManager::Winget => "winget",
            PackageManager::APT => "apt-get",
            PackageManager::DNF => "dnf",
            PackageManager::YUM => "yum",
            PackageManager::Zypper => "zypper",
            PackageManager::Pacman => "pacman",
            PackageManager::Unknown => "unknown",
        }
    }

    /// Detect the distribution package manager of a Linux host.
    pub fn detect(runner: &dyn CommandRunner) -> PackageManager {
        let candidates = [
            PackageManager::APT,
            PackageManager::DNF,
            PackageManager::YUM,
            PackageManager::Zypper,
            PackageManager::Pacman,
        ];
        for candidate in candidates {
            if candidate.is_available(runner) {
                return candidate;
            }
        }
        PackageManager::Unknown
    }

    /// Command whose zero exit status means the manager is usable.
    pub fn probe_command(&self) -> Option<String> {
        match self {
            PackageManager::Homebrew => Some("which brew".to_string()),
            PackageManager::Unknown => None,
            other => Some(format!("{} --version", other.as_str())),
        }
    }

    pub fn is_available(&self, runner: &dyn CommandRunner) -> bool {
        match self.probe_command() {
            Some(probe) => runner.run(&probe).success(),
            None => false,
        }
    }

    pub fn install_command(&self, package: &str) -> Option<String> {
        match self {
            PackageManager::Homebrew => Some(format!("brew install {}", package)),
            PackageManager::Winget => Some(format!(
                "winget install --id {} --exact --accept-package-agreements --accept-source-agreements",
                package
            )),
            PackageManager::APT => Some(format!("sudo apt-get install -y {}", package)),
            PackageManager::DNF => Some(format!("sudo dnf install -y {}", package)),
            PackageManager::YUM => Some(format!("sudo yum install -y {}", package)),
            PackageManager::Zypper => Some(format!("sudo zypper --non-interactive install {}", package)),
            PackageManager::Pacman => Some(format!("sudo pacman -S --noconfirm {}", package)),
            PackageManager::Unknown => None,
        }
    }

    /// Metadata query used to check that a package exists in the manager's index.
    pub fn info_command(&self, package: &str) -> Option<String> {
        match self {
            PackageManager::Homebrew => Some(format!("brew info {}", package)),
            PackageManager::Winget => Some(format!("winget show --id {} --exact", package)),
            PackageManager::APT => Some(format!("apt-cache show {}", package)),
            PackageManager::DNF => Some(format!("dnf info {}", package)),
            PackageManager::YUM => Some(format!("yum info {}", package)),
            PackageManager::Zypper => Some(format!("zypper info {}", package)),
            PackageManager::Pacman => Some(format!("pacman -Si {}", package)),
            PackageManager::Unknown => None,
        }
    }

    /// Package name of a specific runtime release, e.g. `python@3.12`.
    /// `None` when the manager only ships one runtime package.
    pub fn versioned_runtime_package(&self, tag: &str) -> Option<String> {
        match self {
            PackageManager::Homebrew => Some(format!("python@{}", tag)),
            PackageManager::Winget => Some(format!("Python.Python.{}", tag)),
            PackageManager::APT | PackageManager::DNF | PackageManager::YUM => {
                Some(format!("python{}", tag))
            }
            PackageManager::Zypper => Some(format!("python{}", tag.replace('.', ""))),
            PackageManager::Pacman | PackageManager::Unknown => None,
        }
    }

    pub fn generic_runtime_package(&self) -> &str {
        match self {
            PackageManager::Homebrew | PackageManager::Pacman => "python",
            // A bare `python` query matches several winget packages.
            PackageManager::Winget => "Python.Python.3",
            _ => "python3",
        }
    }

    pub fn js_runtime_package(&self) -> &str {
        match self {
            PackageManager::Homebrew => "node",
            PackageManager::Winget => "OpenJS.NodeJS.LTS",
            // Distribution builds split npm (and npx with it) into its own package.
            _ => "nodejs npm",
        }
    }

    /// Command refreshing the runtime's symlinks after an install, if the manager needs one.
    pub fn relink_command(&self, tag: &str) -> Option<String> {
        match self {
            PackageManager::Homebrew => Some(format!("brew link --overwrite python@{}", tag)),
            _ => None,
        }
    }
}

/// Whether a runtime release satisfies [`MIN_RUNTIME_VERSION`].
pub fn is_supported_version(major: u32, minor: u32) -> bool {
    let (min_major, min_minor) = MIN_RUNTIME_VERSION;
    major > min_major || (major == min_major && minor >= min_minor)
}

/// Parse the first `X.Y[.Z]` triple out of a `--version` banner such as
/// `Python 3.11.4`. A missing patch component reads as 0.
pub fn parse_runtime_version(banner: &str) -> Option<(u32, u32, u32)> {
    for token in banner.split_whitespace() {
        let token = token.trim_start_matches('v');
        let mut parts = token.split('.');
        let major = match parts.next().and_then(|p| p.parse::<u32>().ok()) {
            Some(m) => m,
            None => continue,
        };
        let minor = match parts.next().and_then(|p| p.parse::<u32>().ok()) {
            Some(m) => m,
            None => continue,
        };
        // Pre-release suffixes like `0rc1` keep their leading digits.
        let patch = parts
            .next()
            .map(|p| p.chars().take_while(|c| c.is_ascii_digit()).collect::<String>())
            .and_then(|p| p.parse::<u32>().ok())
            .unwrap_or(0);
        return Some((major, minor, patch));
    }
    None
}

/// Check the language runtime answering `version_command`.
///
/// # Returns
/// * `(true, "3.11.4")` when the runtime is recent enough.
/// * `(false, "3.7.9")` when it is too old.
/// * `(false, "unknown")` when no version could be read.
pub fn check_language_runtime_version(runner: &dyn CommandRunner, version_command: &str) -> (bool, String) {
    let output = runner.run(version_command);
    if !output.success() {
        return (false, "unknown".to_string());
    }
    // Old interpreters print the banner on stderr.
    let banner = if output.stdout.is_empty() { &output.stderr } else { &output.stdout };
    match parse_runtime_version(banner) {
        Some((major, minor, patch)) => {
            let version = format!("{}.{}.{}", major, minor, patch);
            (is_supported_version(major, minor), version)
        }
        None => (false, "unknown".to_string()),
    }
}

/// `node --version`, trimmed, when Node.js is installed.
pub fn js_runtime_version(runner: &dyn CommandRunner) -> Option<String> {
    let output = runner.run("node --version");
    if output.success() { Some(output.stdout) } else { None }
}

pub fn has_js_runtime(runner: &dyn CommandRunner) -> bool {
    js_runtime_version(runner).is_some()
}

/// `npx --version`, trimmed, when the package executor is on the search path.
pub fn package_executor_version(runner: &dyn CommandRunner) -> Option<String> {
    let output = runner.run("npx --version");
    if output.success() { Some(output.stdout) } else { None }
}

/// Pick the newest runtime tag the package manager knows about.
///
/// Walks [`PREFERRED_RUNTIME_TAG`] then [`FALLBACK_RUNTIME_TAGS`] and stops at
/// the first tag whose metadata query succeeds; [`DEFAULT_RUNTIME_TAG`] otherwise.
pub fn find_latest_available_runtime_version(runner: &dyn CommandRunner, manager: PackageManager) -> String {
    let tags = std::iter::once(PREFERRED_RUNTIME_TAG).chain(FALLBACK_RUNTIME_TAGS);
    for tag in tags {
        let query = match manager
            .versioned_runtime_package(tag)
            .and_then(|package| manager.info_command(&package))
        {
            Some(q) => q,
            None => break,
        };
        if runner.run(&query).success() {
            debug!(tag, "runtime version available");
            return tag.to_string();
        }
    }
    DEFAULT_RUNTIME_TAG.to_string()
}
