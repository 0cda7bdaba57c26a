//! Best-effort reachability probe of the remote plugin endpoints.
//!
//! One blocking GET per endpoint, sequentially, each bounded by the same
//! timeout. Only HTTP 200 counts as reachable.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::Client;
use tracing::debug;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityEndpoint {
    pub name: String,
    pub url: String,
}

impl ReachabilityEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> ReachabilityEndpoint {
        ReachabilityEndpoint { name: name.into(), url: url.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachabilityResult {
    pub name: String,
    pub url: String,
    pub reachable: bool,
    /// Status code when the server answered at all.
    pub status: Option<u16>,
    /// Transport error text when it did not.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReachabilityReport {
    pub results: Vec<ReachabilityResult>,
}

impl ReachabilityReport {
    /// Logical AND over every endpoint; vacuously true when nothing was checked.
    pub fn all_reachable(&self) -> bool {
        self.results.iter().all(|r| r.reachable)
    }

    pub fn unreachable(&self) -> impl Iterator<Item = &ReachabilityResult> {
        self.results.iter().filter(|r| !r.reachable)
    }
}

/// Probe one endpoint with an already configured client.
pub fn check_endpoint(client: &Client, endpoint: &ReachabilityEndpoint) -> ReachabilityResult {
    let (status, error) = match client.get(&endpoint.url).send() {
        Ok(response) => (Some(response.status()), None),
        Err(e) => (None, Some(e.to_string())),
    };
    debug!(url = %endpoint.url, ?status, ?error, "endpoint probed");

    let reachable = status == Some(StatusCode::OK);
    match (&status, &error) {
        _ if reachable => println!("✅ Server {} reachable", endpoint.name),
        (Some(code), _) => println!("⚠️  Server {} answered with status {}", endpoint.name, code.as_u16()),
        (None, Some(e)) => println!("⚠️  Could not reach server {}: {}", endpoint.name, e),
        (None, None) => println!("⚠️  Could not reach server {}", endpoint.name),
    }

    ReachabilityResult {
        name: endpoint.name.clone(),
        url: endpoint.url.clone(),
        reachable,
        status: status.map(|s| s.as_u16()),
        error,
    }
}

/// Probe every endpoint in order.
///
/// # Arguments
/// * `endpoints` - Endpoints to check, in reporting order.
/// * `timeout` - Upper bound for each request, connection included.
pub fn check_all_endpoints(endpoints: &[ReachabilityEndpoint], timeout: Duration) -> ReachabilityReport {
    println!("🔍 Testing connectivity to the MCP servers...");

    let client = match Client::builder().timeout(timeout).connect_timeout(timeout).build() {
        Ok(client) => client,
        Err(e) => {
            // Without a client nothing can be reached; report each endpoint as such.
            let results = endpoints
                .iter()
                .map(|endpoint| {
                    println!("⚠️  Could not reach server {}: {}", endpoint.name, e);
                    ReachabilityResult {
                        name: endpoint.name.clone(),
                        url: endpoint.url.clone(),
                        reachable: false,
                        status: None,
                        error: Some(e.to_string()),
                    }
                })
                .collect();
            return ReachabilityReport { results };
        }
    };

    let results = endpoints.iter().map(|endpoint| check_endpoint(&client, endpoint)).collect();
    ReachabilityReport { results }
}
