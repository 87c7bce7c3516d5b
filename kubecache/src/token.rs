use std::fmt;

use crate::kubeconfig::Kubeconfig;
use crate::{Error, Result};

/// Lookup half of a Rancher composite token (`<id>:<secret>`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenId(String);

impl TokenId {
    pub fn new(id: impl Into<String>) -> Self {
        TokenId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pulls the token identifier out of a cached kubeconfig.
///
/// The kubeconfig must hold exactly one user, and that user's token must be
/// of the form `<id>:<secret>`. The secret half is never looked at.
pub fn extract(kubeconfig: &Kubeconfig) -> Result<TokenId> {
    let users = &kubeconfig.config().users;
    if users.len() != 1 {
        return Err(Error::MalformedCredential(format!(
            "expected to contain exactly 1 user, found {}",
            users.len()
        )));
    }

    let token = users[0].user.token().ok_or_else(|| {
        Error::MalformedCredential(format!("user {:?} has no token", users[0].name))
    })?;

    match token.split(':').collect::<Vec<_>>()[..] {
        [id, _secret] if !id.is_empty() => Ok(TokenId::new(id)),
        _ => Err(Error::MalformedCredential(
            "failed to parse kubeconfig token".to_string(),
        )),
    }
}
