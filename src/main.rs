use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use mcp_desktop_setup::platform_setup::current_platform;
use mcp_desktop_setup::provision::Provisioner;
use mcp_desktop_setup::settings::{LOG_ENV, Settings};
use mcp_desktop_setup::utils::command::SystemRunner;
use tracing_subscriber::EnvFilter;

fn init_logging() {
    // Diagnostics go to stderr; stdout carries the progress report.
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .init();
}

fn wait_for_enter() {
    print!("\nPress ENTER to close...");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    let settings = Settings::from_env();
    let provisioner = Provisioner::new(current_platform(), Box::new(SystemRunner::new()), settings);
    let pause = provisioner.settings().pause_before_exit && provisioner.adapter().pauses_before_exit();

    let handle = tokio::task::spawn_blocking(move || {
        let report = provisioner.run();
        print!("{}", provisioner.render_summary(&report));
        report
    });

    tokio::select! {
        joined = handle => {
            let code = match joined {
                Ok(report) => {
                    tracing::info!(aborted = report.aborted, "setup finished");
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    println!("\n❌ Unexpected error: {}", e);
                    ExitCode::FAILURE
                }
            };
            if pause {
                // Reading stdin blocks; keep it off the runtime threads.
                let _ = tokio::task::spawn_blocking(wait_for_enter).await;
            }
            code
        }
        Ok(()) = tokio::signal::ctrl_c() => {
            println!("\n\n❌ Setup interrupted by the user");
            // The blocking task cannot be cancelled; leave without waiting for it.
            std::process::exit(1);
        }
    }
}
