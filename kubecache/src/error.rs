use std::io;
use std::path::PathBuf;

use crate::client::ClientError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Configuration(String),
    #[error("invalid kubeconfig, {0}")]
    MalformedCredential(String),
    #[error(transparent)]
    Transport(#[from] ClientError),
    #[error(
        "{name} is required to be set in your path to use this command. \
         See https://kubernetes.io/docs/tasks/tools/install-kubectl/ for more info"
    )]
    ExecutableNotFound { name: String },
    #[error("{action} {}: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn filesystem(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: io::Error,
    ) -> Self {
        Error::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
