pub mod cache;
pub mod cli_config;
pub mod client;
pub mod error;
pub mod exec;
pub mod kubeconfig;
pub mod refresh;
pub mod store;
pub mod token;
pub mod validate;

#[cfg(test)]
mod testing;

use std::path::PathBuf;

pub use cache::KubeconfigCache;
pub use cli_config::{CliConfig, ServerConfig};
pub use client::{ClientError, ManagementApi, ManagementClient};
pub use error::{Error, Result};
pub use store::CacheSettings;

/// `~/.rancher`, home of the Rancher CLI's config and caches.
pub fn rancher_dir() -> Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".rancher"))
        .ok_or_else(|| Error::Configuration("could not determine home directory".to_string()))
}
