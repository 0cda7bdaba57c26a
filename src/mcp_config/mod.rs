//! Desktop application plugin-server configuration.
//!
//! The file has the shape `{ "mcpServers": { <name>: { command, args, env?, disabled? } } }`.
//! Entries keep the order of the table they were built from, and `disabled`
//! is only written (as a JSON `true`) for servers that are switched off.

pub mod servers;

use std::fs::{create_dir_all, write};

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use tracing::debug;

use crate::error::{Result, SetupError};
use crate::platform_setup::setup_utils::PlatformPaths;

/// One plugin server the desktop application launches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PluginServerSpec {
    pub name: String,
    pub command: String,
    pub args: Vec<String>,
    /// Environment handed to the server, in file order. Values may be placeholders.
    pub env: Vec<(String, String)>,
    pub enabled: bool,
}

impl PluginServerSpec {
    pub fn new(name: impl Into<String>, command: impl Into<String>) -> PluginServerSpec {
        PluginServerSpec {
            name: name.into(),
            command: command.into(),
            args: Vec::new(),
            env: Vec::new(),
            enabled: true,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> PluginServerSpec
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> PluginServerSpec {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn disabled(mut self) -> PluginServerSpec {
        self.enabled = false;
        self
    }
}

struct EnvVars<'a>(&'a [(String, String)]);

impl Serialize for EnvVars<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct ServerEntry<'a> {
    command: &'a str,
    args: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    env: Option<EnvVars<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    disabled: Option<bool>,
}

impl<'a> From<&'a PluginServerSpec> for ServerEntry<'a> {
    fn from(spec: &'a PluginServerSpec) -> Self {
        ServerEntry {
            command: &spec.command,
            args: &spec.args,
            env: if spec.env.is_empty() { None } else { Some(EnvVars(&spec.env)) },
            disabled: if spec.enabled { None } else { Some(true) },
        }
    }
}

struct ServerTable<'a>(&'a [PluginServerSpec]);

impl Serialize for ServerTable<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for spec in self.0 {
            map.serialize_entry(&spec.name, &ServerEntry::from(spec))?;
        }
        map.end()
    }
}

#[derive(Serialize)]
struct DesktopConfig<'a> {
    #[serde(rename = "mcpServers")]
    mcp_servers: ServerTable<'a>,
}

/// Serialize `servers` exactly as [`write_config`] stores them: UTF-8,
/// two-space indentation, non-ASCII left unescaped.
pub fn render_config(servers: &[PluginServerSpec]) -> Result<String> {
    let config = DesktopConfig { mcp_servers: ServerTable(servers) };
    Ok(serde_json::to_string_pretty(&config)?)
}

/// Write the configuration file, creating missing directories and replacing
/// whatever file was there before.
pub fn write_config(paths: &PlatformPaths, servers: &[PluginServerSpec]) -> Result<()> {
    let rendered = render_config(servers)?;

    let dir = paths.get_config_dir();
    if let Err(e) = create_dir_all(dir) {
        return Err(SetupError::io(dir, e));
    }
    debug!(dir = %dir.display(), "config directory ready");

    let file = paths.get_config_file();
    match write(file, rendered.as_bytes()) {
        Ok(()) => Ok(()),
        Err(e) => Err(SetupError::io(file, e)),
    }
}
