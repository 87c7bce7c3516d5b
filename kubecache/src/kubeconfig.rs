use std::path::PathBuf;

use serde::Deserialize;
use serde_yaml::Value as YamlValue;

use crate::Error;

// region: Context
#[derive(Deserialize, Debug, Clone)]
pub struct ContextSpec {
    pub user: String,
    pub namespace: Option<String>,
    pub cluster: String,
    pub extensions: Option<YamlValue>,
}
#[derive(Deserialize, Debug)]
pub struct Context {
    pub name: String,
    pub context: ContextSpec,
}
// endregion

// region: Cluster
#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct ClusterSpec {
    pub certificate_authority_data: Option<String>,
    pub certificate_authority: Option<PathBuf>,
    pub insecure_skip_tls_verify: Option<YamlValue>,
    pub server: String,
    pub extensions: Option<YamlValue>,
}

#[derive(Deserialize, Debug)]
pub struct Cluster {
    pub name: String,
    pub cluster: ClusterSpec,
}
// endregion

// region: User
/// Credentials of a kubeconfig user entry.
///
/// Rancher only ever hands out bearer tokens. Other keys (`username`, `as`,
/// exec plugins, ...) are ignored and never hide the token.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default, rename_all = "kebab-case")]
pub struct UserSpec {
    pub token: Option<String>,
    pub client_certificate: Option<PathBuf>,
    pub client_certificate_data: Option<String>,
    pub client_key: Option<PathBuf>,
    pub client_key_data: Option<String>,
}

impl UserSpec {
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }
}

#[derive(Deserialize, Debug)]
pub struct User {
    pub name: String,
    #[serde(default)]
    pub user: UserSpec,
}
// endregion

// region: Common
#[derive(Deserialize, Debug)]
pub enum ApiVersion {
    #[serde(rename = "v1")]
    V1,
}
#[derive(Deserialize, Debug)]
pub enum Kind {
    Config,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct KubeConfig {
    pub kind: Kind,
    #[serde(rename = "apiVersion")]
    pub api_version: ApiVersion,
    #[serde(default)]
    pub contexts: Vec<Context>,
    #[serde(default)]
    pub current_context: String,
    #[serde(default)]
    pub clusters: Vec<Cluster>,
    #[serde(default)]
    pub preferences: YamlValue,
    #[serde(default)]
    pub users: Vec<User>,
}
// endregion

/// A kubeconfig as it sits in the cache: the exact bytes handed out by the
/// management server plus the parsed view used to inspect it.
#[derive(Debug)]
pub struct Kubeconfig {
    raw: String,
    config: KubeConfig,
}

impl Kubeconfig {
    pub fn parse(raw: impl Into<String>) -> Result<Self, Error> {
        let raw = raw.into();
        let config = serde_yaml::from_str(&raw)
            .map_err(|err| Error::MalformedCredential(format!("parsing kubeconfig: {err}")))?;
        Ok(Self { raw, config })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn config(&self) -> &KubeConfig {
        &self.config
    }
}
