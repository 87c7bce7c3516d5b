use crate::client::ManagementApi;
use crate::token::TokenId;
use crate::Result;

/// Whether the token behind a cached kubeconfig can still be used.
///
/// A token the server no longer knows about was revoked or rotated away; that
/// is an ordinary `false`, not an error. Every other failure is.
pub fn is_valid(api: &impl ManagementApi, token_id: &TokenId) -> Result<bool> {
    match api.token_by_id(token_id.as_str()) {
        Ok(token) => {
            tracing::debug!(token = %token_id, expired = token.expired, "looked up cached token");
            Ok(!token.expired)
        }
        Err(err) if err.is_not_found() => {
            tracing::debug!(token = %token_id, "cached token no longer exists");
            Ok(false)
        }
        Err(err) => Err(err.into()),
    }
}
