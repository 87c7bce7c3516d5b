use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::{rancher_dir, Error, Result};

pub const CONFIG_FILE_NAME: &str = "cli2.json";

/// The Rancher CLI's session file: every server logged into, and which one is
/// currently focused.
#[derive(Deserialize, Debug, Default)]
pub struct CliConfig {
    #[serde(rename = "Servers", default)]
    pub servers: BTreeMap<String, ServerConfig>,
    #[serde(rename = "CurrentServer", default)]
    pub current_server: String,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(default, rename_all = "camelCase")]
pub struct ServerConfig {
    pub access_key: String,
    pub secret_key: String,
    pub token_key: String,
    pub url: String,
    /// `<cluster id>:<project id>`
    pub project: String,
    #[serde(rename = "cacert")]
    pub ca_certs: String,
}

impl CliConfig {
    /// `~/.rancher/cli2.json`
    pub fn default_path() -> Result<PathBuf> {
        Ok(rancher_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Reads the session file; never having logged in yields an empty config.
    pub fn load(path: &Path) -> Result<CliConfig> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no CLI config");
                return Ok(CliConfig::default());
            }
            Err(err) => return Err(Error::filesystem("reading", path, err)),
        };

        serde_json::from_str(&content).map_err(|err| {
            Error::Configuration(format!("parsing {}: {err}", path.display()))
        })
    }

    pub fn focused_server(&self) -> Result<&ServerConfig> {
        self.servers
            .get(&self.current_server)
            .ok_or_else(|| Error::Configuration("no focused server".to_string()))
    }
}

impl ServerConfig {
    pub fn focused_cluster(&self) -> Result<&str> {
        match self.project.split(':').next() {
            Some(cluster) if !cluster.is_empty() => Ok(cluster),
            _ => Err(Error::Configuration(
                "no focused cluster, run `rancher context switch` first".to_string(),
            )),
        }
    }
}
