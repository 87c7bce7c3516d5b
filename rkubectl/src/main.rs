use std::env;
use std::path::PathBuf;
use std::process;

use anyhow::Context as _;
use clap::{AppSettings, Parser};
use console::style;
use tracing_subscriber::EnvFilter;

use kubecache::cli_config::CONFIG_FILE_NAME;
use kubecache::{exec, CacheSettings, CliConfig, KubeconfigCache, ManagementClient, ServerConfig};

/// Rancher CLI config directory, instead of `~/.rancher`.
const CONFIG_DIR_ENV: &str = "RANCHER_CONFIG_DIR";
/// Directory the generated kubeconfigs are cached in.
const CACHE_DIR_ENV: &str = "RKUBECTL_CACHE_DIR";

/// Run kubectl commands
///
/// Use the current cluster context to run kubectl commands in the cluster.
/// Every argument is handed to kubectl unchanged.
#[derive(Parser, Debug)]
#[clap(setting = AppSettings::TrailingVarArg)]
#[clap(setting = AppSettings::AllowHyphenValues)]
struct Cli {
    /// kubectl arguments
    #[clap(allow_hyphen_values = true, multiple_values = true)]
    args: Vec<String>,
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("{} {err:#}", style("error:").red().bold());
            process::exit(1);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kubecache=info,rkubectl=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn env_dir(name: &str) -> Option<PathBuf> {
    env::var_os(name)
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
}

fn run(cli: Cli) -> anyhow::Result<i32> {
    let kubectl = exec::find_executable("kubectl")?;

    let config_path = match env_dir(CONFIG_DIR_ENV) {
        Some(dir) => dir.join(CONFIG_FILE_NAME),
        None => CliConfig::default_path()?,
    };
    let config = CliConfig::load(&config_path)?;
    let server = config.focused_server()?;
    let cluster_id = server.focused_cluster()?;

    let client = management_client(server)?;
    let current_user = client
        .get_token(&server.access_key)
        .context("looking up the current user")?
        .user_id;

    let settings = match env_dir(CACHE_DIR_ENV) {
        Some(dir) => CacheSettings::new(dir),
        None => CacheSettings::from_home()?,
    };
    let kubeconfig = KubeconfigCache::new(settings, &client).ensure(&current_user, cluster_id)?;

    tracing::debug!(kubeconfig = %kubeconfig.display(), args = ?cli.args, "running kubectl");
    let status = exec::kubectl_command(&kubectl, &cli.args, &kubeconfig)
        .status()
        .with_context(|| format!("running {}", kubectl.display()))?;

    Ok(status.code().unwrap_or(1))
}

fn management_client(server: &ServerConfig) -> anyhow::Result<ManagementClient> {
    let mut builder = ManagementClient::builder(&server.url)
        .with_context(|| format!("invalid server url {:?}", server.url))?
        .basic_auth(&server.access_key, &server.secret_key);
    if !server.ca_certs.is_empty() {
        builder = builder
            .add_ca_cert_pem(server.ca_certs.as_bytes())
            .context("loading the server's CA certificate")?;
    }
    Ok(builder.build()?)
}
