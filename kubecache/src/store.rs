use std::fs;
use std::io::{self, Write as _};
use std::path::{Path, PathBuf};

use crate::kubeconfig::Kubeconfig;
use crate::{rancher_dir, Error, Result};

/// Where cached kubeconfigs live.
#[derive(Debug, Clone)]
pub struct CacheSettings {
    pub root: PathBuf,
}

impl CacheSettings {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// `~/.rancher/.cache/kubeconfig`
    pub fn from_home() -> Result<Self> {
        Ok(Self::new(rancher_dir()?.join(".cache").join("kubeconfig")))
    }

    /// One file per (user, cluster) pair, so switching either one addresses a
    /// different entry.
    pub fn cache_path(&self, user_id: &str, cluster_id: &str) -> PathBuf {
        self.root.join(format!("{user_id}-{cluster_id}-kubeconfig"))
    }
}

/// Reads a cached kubeconfig. A missing or empty file means nothing is cached.
pub fn load(path: &Path) -> Result<Option<Kubeconfig>> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(Error::filesystem("reading", path, err)),
    };

    if bytes.is_empty() {
        return Ok(None);
    }

    let content = String::from_utf8(bytes)
        .map_err(|err| Error::MalformedCredential(format!("kubeconfig is not UTF-8: {err}")))?;

    Kubeconfig::parse(content).map(Some)
}

/// Replaces whatever is cached at `path` with `kubeconfig`.
///
/// The content goes to a sibling temp file first and is renamed into place,
/// so a reader sees either the old file or the new one.
pub fn save(path: &Path, kubeconfig: &str) -> Result<()> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    create_private_dir(dir).map_err(|err| Error::filesystem("creating", dir, err))?;

    tracing::info!("Saving config to {}", path.display());

    let mut file = tempfile::NamedTempFile::new_in(dir)
        .map_err(|err| Error::filesystem("creating temp file in", dir, err))?;
    file.write_all(kubeconfig.as_bytes())
        .and_then(|()| file.as_file().sync_all())
        .map_err(|err| Error::filesystem("writing", file.path(), err))?;
    file.persist(path)
        .map_err(|err| Error::filesystem("replacing", path, err.error))?;

    Ok(())
}

#[cfg(unix)]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    use std::os::unix::fs::DirBuilderExt;

    fs::DirBuilder::new().recursive(true).mode(0o700).create(dir)
}

#[cfg(not(unix))]
fn create_private_dir(dir: &Path) -> io::Result<()> {
    fs::create_dir_all(dir)
}
