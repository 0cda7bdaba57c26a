//! The setup sequence.
//!
//! Phases run strictly in order and each one leaves a [`ProvisioningStep`]
//! behind. Only two phases can stop the run: installing the JavaScript runtime
//! and writing the configuration file. Everything else is reported and skipped
//! past.

use std::fmt::Write as _;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::mcp_config::servers::{default_endpoints, default_servers};
use crate::mcp_config::{PluginServerSpec, render_config, write_config};
use crate::platform_setup::setup_utils::{PlatformAdapter, PlatformPaths};
use crate::reachability::{ReachabilityEndpoint, ReachabilityReport, check_all_endpoints};
use crate::settings::Settings;
use crate::utils::command::CommandRunner;
use crate::utils::dependencies::{check_language_runtime_version, js_runtime_version, package_executor_version};

pub const DOWNLOAD_PAGE: &str = "https://claude.ai/download";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Succeeded,
    /// Soft failure: reported, the run goes on.
    Warning,
    /// Phase failure that stopped the run.
    Failed,
}

impl StepOutcome {
    fn marker(&self) -> &'static str {
        match self {
            StepOutcome::Succeeded => "✅",
            StepOutcome::Warning => "⚠️ ",
            StepOutcome::Failed => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisioningStep {
    pub label: String,
    pub outcome: StepOutcome,
    pub detail: String,
}

impl ProvisioningStep {
    fn new(label: impl Into<String>, outcome: StepOutcome, detail: impl Into<String>) -> ProvisioningStep {
        ProvisioningStep { label: label.into(), outcome, detail: detail.into() }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == StepOutcome::Succeeded
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProvisioningReport {
    pub steps: Vec<ProvisioningStep>,
    /// A fatal phase failed and later phases were skipped.
    pub aborted: bool,
    pub runtime_installed: bool,
    pub js_runtime_installed: bool,
    pub config_file: Option<PathBuf>,
    pub reachability: Option<ReachabilityReport>,
}

impl ProvisioningReport {
    fn push(&mut self, label: impl Into<String>, outcome: StepOutcome, detail: impl Into<String>) {
        let step = ProvisioningStep::new(label, outcome, detail);
        match step.outcome {
            StepOutcome::Succeeded => info!(label = %step.label, "step succeeded"),
            _ => warn!(label = %step.label, detail = %step.detail, "step did not succeed"),
        }
        self.steps.push(step);
    }

    fn abort(mut self) -> ProvisioningReport {
        self.aborted = true;
        self
    }
}

pub struct Provisioner {
    adapter: Box<dyn PlatformAdapter>,
    runner: Box<dyn CommandRunner>,
    settings: Settings,
    servers: Vec<PluginServerSpec>,
    endpoints: Vec<ReachabilityEndpoint>,
}

impl Provisioner {
    /// Provisioner writing the default server table and probing the default endpoints.
    pub fn new(adapter: Box<dyn PlatformAdapter>, runner: Box<dyn CommandRunner>, settings: Settings) -> Provisioner {
        Provisioner {
            adapter,
            runner,
            settings,
            servers: default_servers(),
            endpoints: default_endpoints(),
        }
    }

    pub fn with_servers(mut self, servers: Vec<PluginServerSpec>) -> Provisioner {
        self.servers = servers;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Vec<ReachabilityEndpoint>) -> Provisioner {
        self.endpoints = endpoints;
        self
    }

    pub fn adapter(&self) -> &dyn PlatformAdapter {
        self.adapter.as_ref()
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Configuration location for this run, honouring the directory override.
    pub fn config_paths(&self) -> crate::error::Result<PlatformPaths> {
        match &self.settings.config_dir_override {
            Some(dir) => Ok(PlatformPaths::in_directory(dir)),
            None => self.adapter.resolve_config_path(),
        }
    }

    /// Run every phase in order.
    pub fn run(&self) -> ProvisioningReport {
        let runner = self.runner.as_ref();
        let adapter = self.adapter.as_ref();
        let mut report = ProvisioningReport::default();

        println!("🚀 Automatic Claude Desktop MCP setup for {}", adapter.name());
        println!("{}", "=".repeat(50));

        println!("\n0️⃣ Checking Python...");
        if let Some(elevated) = adapter.is_elevated(runner) {
            if elevated {
                println!("🔑 Running with administrator rights");
            } else {
                println!("ℹ️  Not running as administrator, some installs may ask for confirmation");
            }
        }
        let (runtime_ok, runtime_version) = check_language_runtime_version(runner, adapter.runtime_version_command());
        println!("🐍 Current Python: {}", runtime_version);
        if runtime_ok {
            println!("✅ Python {} is supported", runtime_version);
            report.push(format!("Python {} ok", runtime_version), StepOutcome::Succeeded, runtime_version);
        } else {
            println!("⚠️  Python {} is missing or too old (minimum: 3.8), installing...", runtime_version);
            if adapter.install_runtime(runner) {
                report.runtime_installed = true;
                println!("🔄 Restart the terminal after the installation to use the new version");
                report.push("Python installed/updated", StepOutcome::Succeeded, runtime_version);
            } else {
                println!("❌ Python installation failed");
                println!("ℹ️  The setup continues with the current version...");
                report.push(
                    "Python not updated (continuing anyway)",
                    StepOutcome::Warning,
                    runtime_version,
                );
            }
        }

        println!("\n1️⃣ Checking Node.js...");
        match js_runtime_version(runner) {
            Some(version) => {
                println!("✅ Node.js already installed: {}", version);
                report.push("Node.js already present", StepOutcome::Succeeded, version);
            }
            None => {
                if adapter.install_js_runtime(runner) {
                    report.js_runtime_installed = true;
                    report.push("Node.js installed", StepOutcome::Succeeded, "");
                } else {
                    println!("❌ Node.js installation failed");
                    println!("ℹ️  Download it manually from https://nodejs.org/");
                    report.push("Node.js not installed", StepOutcome::Failed, "");
                    return report.abort();
                }
            }
        }

        println!("\n2️⃣ Checking npx...");
        match package_executor_version(runner) {
            Some(version) => {
                println!("✅ npx available: {}", version);
                report.push("npx verified", StepOutcome::Succeeded, version);
            }
            None => {
                println!("⚠️  npx not available, a terminal restart may be needed");
                report.push("npx to verify after a terminal restart", StepOutcome::Warning, "");
            }
        }

        println!("\n3️⃣ Checking Claude Desktop...");
        match adapter.locate_application() {
            Some(path) => {
                println!("✅ Claude Desktop found in {}", path.display());
                report.push("Claude Desktop found", StepOutcome::Succeeded, path.display().to_string());
            }
            None => {
                println!("⚠️  Claude Desktop not found in the standard locations");
                report.push("Claude Desktop not found", StepOutcome::Warning, DOWNLOAD_PAGE);
            }
        }

        println!("\n4️⃣ Writing the configuration file...");
        let paths = match self.config_paths() {
            Ok(paths) => paths,
            Err(e) => {
                println!("❌ Could not resolve the configuration path: {}", e);
                report.push("Configuration file not written", StepOutcome::Failed, e.to_string());
                return report.abort();
            }
        };
        match write_config(&paths, &self.servers) {
            Ok(()) => {
                println!("📁 Directory created/verified: {}", paths.get_config_dir().display());
                println!("✅ Configuration file written: {}", paths.get_config_file().display());
                if let Ok(rendered) = render_config(&self.servers) {
                    println!("\n📄 Configuration file contents:");
                    println!("{}", rendered);
                }
                report.config_file = Some(paths.get_config_file().to_path_buf());
                report.push(
                    format!("Configuration file written ({} MCP servers)", self.servers.len()),
                    StepOutcome::Succeeded,
                    paths.get_config_file().display().to_string(),
                );
            }
            Err(e) => {
                println!("❌ Error while writing the configuration file: {}", e);
                report.push("Configuration file not written", StepOutcome::Failed, e.to_string());
                return report.abort();
            }
        }

        println!("\n5️⃣ Testing MCP server connectivity...");
        let reachability = check_all_endpoints(&self.endpoints, self.settings.http_timeout);
        if reachability.all_reachable() {
            report.push("All MCP servers reachable", StepOutcome::Succeeded, "");
        } else {
            let names: Vec<&str> = reachability.unreachable().map(|r| r.name.as_str()).collect();
            report.push(
                "Some MCP servers unreachable (they may work anyway)",
                StepOutcome::Warning,
                names.join(", "),
            );
        }
        report.reachability = Some(reachability);

        report
    }

    /// Final summary and next-step guidance for `report`.
    pub fn render_summary(&self, report: &ProvisioningReport) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "\n{}", "=".repeat(50));
        let _ = writeln!(out, "📋 SETUP SUMMARY:");
        for step in &report.steps {
            let _ = writeln!(out, "  {} {}", step.outcome.marker(), step.label);
        }

        if report.aborted {
            let _ = writeln!(out, "\n❌ Setup stopped before completion, fix the failed step and run it again.");
            return out;
        }

        let _ = writeln!(out, "\n🎉 Setup complete!");
        let _ = writeln!(out, "\n📝 CONFIGURED MCP SERVERS:");
        for server in &self.servers {
            if server.enabled {
                let _ = writeln!(out, "• {}", server.name);
            } else {
                let _ = writeln!(out, "• {} (disabled)", server.name);
            }
        }

        let _ = writeln!(out, "\n📥 NEXT STEPS:");
        let mut steps = vec![format!("Make sure Claude Desktop is installed from: {}", DOWNLOAD_PAGE)];
        if report.runtime_installed || report.js_runtime_installed {
            steps.push("IMPORTANT: restart the terminal to use the newly installed runtimes".to_string());
        }
        steps.push("Quit Claude Desktop completely if it is open".to_string());
        steps.push("Start Claude Desktop again".to_string());
        steps.push("The MCP servers should load automatically".to_string());
        steps.push("Fill in the placeholder API keys in the configuration file".to_string());
        steps.push("Try it with prompts such as:".to_string());
        for (i, step) in steps.iter().enumerate() {
            let _ = writeln!(out, "{}. {}", i + 1, step);
        }
        for example in [
            "'show my Google Search Console properties'",
            "'get the GA4 metrics for my property'",
            "'search Reddit for information about Python'",
            "'show the active Google Ads campaigns'",
        ] {
            let _ = writeln!(out, "   • {}", example);
        }

        if let Some(file) = &report.config_file {
            let _ = writeln!(out, "\n📁 Configuration file saved to:");
            let _ = writeln!(out, "   {}", file.display());
        }
        out
    }
}
