//! In-memory stand-in for the management API.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::client::{ApiError, ClientError, ManagementApi, Token};

#[derive(Debug, Clone, Copy)]
pub enum TokenState {
    Live,
    Expired,
    NotFound,
    Unreachable,
}

#[derive(Default)]
pub struct FakeApi {
    tokens: HashMap<String, TokenState>,
    kubeconfigs: HashMap<String, String>,
    token_lookups: RefCell<Vec<String>>,
    generated_for: RefCell<Vec<String>>,
}

pub fn kubeconfig_yaml(token: &str) -> String {
    format!(
        "apiVersion: v1\nkind: Config\nclusters:\n- name: local\n  cluster:\n    server: https://rancher.example.com/k8s/clusters/local\nusers:\n- name: local\n  user:\n    token: \"{token}\"\ncontexts:\n- name: local\n  context:\n    user: local\n    cluster: local\ncurrent-context: local\n"
    )
}

fn api_error(status: u16, code: &str) -> ClientError {
    ClientError::Api(ApiError {
        status,
        code: code.to_string(),
        message: String::new(),
    })
}

impl FakeApi {
    pub fn with_token(id: &str, state: TokenState) -> Self {
        let mut api = Self::default();
        api.tokens.insert(id.to_string(), state);
        api
    }

    /// `generate_kubeconfig(cluster_id)` answers with a kubeconfig carrying `token`.
    pub fn generating(mut self, cluster_id: &str, token: &str) -> Self {
        self.kubeconfigs
            .insert(cluster_id.to_string(), kubeconfig_yaml(token));
        self
    }

    pub fn token_lookups(&self) -> Vec<String> {
        self.token_lookups.borrow().clone()
    }

    pub fn generated_for(&self) -> Vec<String> {
        self.generated_for.borrow().clone()
    }
}

impl ManagementApi for FakeApi {
    fn token_by_id(&self, id: &str) -> Result<Token, ClientError> {
        self.token_lookups.borrow_mut().push(id.to_string());
        let expired = match self.tokens.get(id) {
            Some(TokenState::Live) => false,
            Some(TokenState::Expired) => true,
            Some(TokenState::Unreachable) => return Err(api_error(502, "BadGateway")),
            Some(TokenState::NotFound) | None => return Err(api_error(404, "NotFound")),
        };
        Ok(Token {
            id: id.to_string(),
            user_id: "u-test".to_string(),
            expired,
            ..Token::default()
        })
    }

    fn generate_kubeconfig(&self, cluster_id: &str) -> Result<String, ClientError> {
        self.generated_for.borrow_mut().push(cluster_id.to_string());
        self.kubeconfigs
            .get(cluster_id)
            .cloned()
            .ok_or_else(|| api_error(403, "PermissionDenied"))
    }
}
