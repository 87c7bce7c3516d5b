use std::path::PathBuf;

use crate::client::ManagementApi;
use crate::store::{self, CacheSettings};
use crate::{refresh, token, validate, Result};

/// Keeps one ready-to-use kubeconfig per (user, cluster) on disk, asking the
/// management server for a new one only when the cached one is missing or its
/// token is no longer valid.
pub struct KubeconfigCache<A> {
    settings: CacheSettings,
    api: A,
}

impl<A: ManagementApi> KubeconfigCache<A> {
    pub fn new(settings: CacheSettings, api: A) -> Self {
        Self { settings, api }
    }

    /// Returns the path of a usable kubeconfig for `cluster_id`, regenerating it
    /// first when needed.
    ///
    /// A cached kubeconfig that cannot be parsed, or whose token cannot be
    /// extracted, is reported rather than silently replaced.
    pub fn ensure(&self, user_id: &str, cluster_id: &str) -> Result<PathBuf> {
        let path = self.settings.cache_path(user_id, cluster_id);

        let usable = match store::load(&path)? {
            Some(cached) => {
                let token_id = token::extract(&cached)?;
                validate::is_valid(&self.api, &token_id)?
            }
            None => {
                tracing::debug!(path = %path.display(), "no cached kubeconfig");
                false
            }
        };

        if usable {
            tracing::debug!(path = %path.display(), "reusing cached kubeconfig");
        } else {
            let kubeconfig = refresh::refresh(&self.api, cluster_id)?;
            store::save(&path, &kubeconfig)?;
        }

        Ok(path)
    }
}
