use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::{Error, Result};

pub const KUBECONFIG_ENV: &str = "KUBECONFIG";

/// Finds `name` on `PATH`.
pub fn find_executable(name: &str) -> Result<PathBuf> {
    let search_path = env::var_os("PATH").unwrap_or_default();
    find_in(name, &search_path).ok_or_else(|| Error::ExecutableNotFound {
        name: name.to_string(),
    })
}

fn find_in(name: &str, search_path: &OsStr) -> Option<PathBuf> {
    env::split_paths(search_path)
        .filter(|dir| !dir.as_os_str().is_empty())
        .flat_map(|dir| candidates(&dir, name))
        .find(|candidate| is_executable(candidate))
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name), dir.join(format!("{name}.exe"))]
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// `kubectl <args>` talking to the cluster described by `kubeconfig`, with the
/// terminal handed straight through.
pub fn kubectl_command<I, S>(kubectl: &Path, args: I, kubeconfig: &Path) -> Command
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut cmd = Command::new(kubectl);
    cmd.args(args)
        .env(KUBECONFIG_ENV, kubeconfig)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit());
    cmd
}
