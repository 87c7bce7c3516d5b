use std::collections::BTreeMap;
use std::fmt;

use reqwest::blocking::{Client as HttpClient, RequestBuilder, Response};
use reqwest::{Certificate, StatusCode};
use serde::Deserialize;
use url::Url;

const GENERATE_KUBECONFIG: &str = "generateKubeconfig";

/// Error body returned by the management API.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "status={}, code={}", self.status, self.code)
        } else {
            write!(
                f,
                "status={}, code={}, message={}",
                self.status, self.code, self.message
            )
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid server url: {0}")]
    InvalidBaseUrl(String),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("cluster {0} does not offer the generateKubeconfig action")]
    ActionUnavailable(String),
    #[error("rancher api error: {0}")]
    Api(ApiError),
}

impl ClientError {
    /// The object asked for does not exist (or is no longer visible to us).
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api(err) if err.status == StatusCode::NOT_FOUND.as_u16())
    }
}

// region: Models
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub name: String,
    pub user_id: String,
    pub expired: bool,
    pub expires_at: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub actions: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct GenerateKubeconfigOutput {
    pub config: String,
}
// endregion

/// The two management API calls the kubeconfig cache relies on.
pub trait ManagementApi {
    fn token_by_id(&self, id: &str) -> Result<Token, ClientError>;

    /// Mints a fresh kubeconfig for `cluster_id` and returns it verbatim.
    fn generate_kubeconfig(&self, cluster_id: &str) -> Result<String, ClientError>;
}

impl<T: ManagementApi + ?Sized> ManagementApi for &T {
    fn token_by_id(&self, id: &str) -> Result<Token, ClientError> {
        (**self).token_by_id(id)
    }

    fn generate_kubeconfig(&self, cluster_id: &str) -> Result<String, ClientError> {
        (**self).generate_kubeconfig(cluster_id)
    }
}

pub struct ManagementClientBuilder {
    base_url: Url,
    ca_certs: Vec<Certificate>,
    basic_auth: Option<(String, String)>,
}

impl ManagementClientBuilder {
    pub fn new(server_url: impl AsRef<str>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: api_base_url(server_url.as_ref())?,
            ca_certs: Vec::new(),
            basic_auth: None,
        })
    }

    pub fn basic_auth(
        mut self,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        self.basic_auth = Some((access_key.into(), secret_key.into()));
        self
    }

    pub fn add_ca_cert_pem(mut self, ca_pem: &[u8]) -> Result<Self, ClientError> {
        self.ca_certs.push(Certificate::from_pem(ca_pem)?);
        Ok(self)
    }

    pub fn build(self) -> Result<ManagementClient, ClientError> {
        let mut builder = HttpClient::builder();
        for cert in self.ca_certs {
            builder = builder.add_root_certificate(cert);
        }
        let http = builder.build()?;
        Ok(ManagementClient {
            base_url: self.base_url,
            http,
            basic_auth: self.basic_auth,
        })
    }
}

/// Blocking client for the Rancher management API (`/v3`).
pub struct ManagementClient {
    base_url: Url,
    http: HttpClient,
    basic_auth: Option<(String, String)>,
}

impl ManagementClient {
    pub fn builder(server_url: impl AsRef<str>) -> Result<ManagementClientBuilder, ClientError> {
        ManagementClientBuilder::new(server_url)
    }

    pub fn get_token(&self, id: &str) -> Result<Token, ClientError> {
        let url = self.build_url(&["tokens", id])?;
        let resp = self.apply_auth(self.http.get(url)).send()?;
        self.expect_ok_json(resp)
    }

    pub fn get_cluster(&self, id: &str) -> Result<Cluster, ClientError> {
        let url = self.build_url(&["clusters", id])?;
        let resp = self.apply_auth(self.http.get(url)).send()?;
        self.expect_ok_json(resp)
    }

    pub fn action_generate_kubeconfig(
        &self,
        cluster: &Cluster,
    ) -> Result<GenerateKubeconfigOutput, ClientError> {
        let url = match cluster.actions.get(GENERATE_KUBECONFIG) {
            Some(link) => Url::parse(link)?,
            None if cluster.actions.is_empty() => {
                let mut url = self.build_url(&["clusters", &cluster.id])?;
                url.query_pairs_mut()
                    .append_pair("action", GENERATE_KUBECONFIG);
                url
            }
            None => return Err(ClientError::ActionUnavailable(cluster.id.clone())),
        };
        let resp = self.apply_auth(self.http.post(url)).send()?;
        self.expect_ok_json(resp)
    }

    fn build_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        {
            let mut path_segments = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?;
            path_segments.pop_if_empty();
            for segment in segments {
                path_segments.push(segment);
            }
        }
        Ok(url)
    }

    fn apply_auth(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.basic_auth {
            Some((access_key, secret_key)) => req.basic_auth(access_key, Some(secret_key)),
            None => req,
        }
    }

    fn expect_ok_json<T: serde::de::DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<T, ClientError> {
        if resp.status().is_success() {
            let body = resp.bytes()?;
            Ok(serde_json::from_slice(&body)?)
        } else {
            self.parse_error(resp)
        }
    }

    fn parse_error<T>(&self, resp: Response) -> Result<T, ClientError> {
        let status = resp.status();
        let body = resp.bytes()?;
        let mut err = serde_json::from_slice::<ApiError>(&body).unwrap_or_else(|_| ApiError {
            status: status.as_u16(),
            code: status.canonical_reason().unwrap_or_default().to_string(),
            message: String::from_utf8_lossy(&body).to_string(),
        });
        err.status = status.as_u16();
        Err(ClientError::Api(err))
    }
}

impl ManagementApi for ManagementClient {
    fn token_by_id(&self, id: &str) -> Result<Token, ClientError> {
        self.get_token(id)
    }

    fn generate_kubeconfig(&self, cluster_id: &str) -> Result<String, ClientError> {
        let cluster = self.get_cluster(cluster_id)?;
        Ok(self.action_generate_kubeconfig(&cluster)?.config)
    }
}

/// `https://rancher.example.com` and `https://rancher.example.com/v3/` both
/// resolve to `https://rancher.example.com/v3`.
fn api_base_url(server_url: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(server_url)?;
    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidBaseUrl(server_url.to_string()));
    }
    let path = url.path().trim_end_matches('/').to_string();
    if !path.ends_with("/v3") {
        url.set_path(&format!("{path}/v3"));
    } else {
        url.set_path(&path);
    }
    Ok(url)
}
