use crate::client::ManagementApi;
use crate::Result;

/// Asks the management server for a brand new kubeconfig for `cluster_id`.
/// One attempt; any failure goes straight back to the caller.
pub fn refresh(api: &impl ManagementApi, cluster_id: &str) -> Result<String> {
    tracing::debug!(cluster = cluster_id, "generating kubeconfig");
    Ok(api.generate_kubeconfig(cluster_id)?)
}
