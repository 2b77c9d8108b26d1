use super::*;

use subscription_reaper::DEFAULT_TTL_HOURS;

/// Deletes Open Cluster Management subscriptions that outlive their TTL.
///
/// Subscriptions in protected namespaces (kube-system and
/// open-cluster-management, plus any given with --protect) are never deleted.
#[derive(Debug, Parser)]
#[command(name = "subscription-reaper", version, about, long_about)]
pub(crate) struct Cli {
    /// Path to a kubeconfig file, used when in-cluster credentials are unavailable.
    /// Defaults to $KUBECONFIG or ~/.kube/config.
    #[arg(long, value_name = "PATH")]
    pub(crate) kubeconfig: Option<PathBuf>,

    /// Only reap subscriptions in this namespace (empty means all namespaces)
    #[arg(short, long, default_value = "")]
    pub(crate) namespace: String,

    /// Delete subscriptions at least this many whole hours old
    #[arg(long, value_name = "HOURS", default_value_t = DEFAULT_TTL_HOURS)]
    pub(crate) ttl: u32,

    /// Pause between passes, as a Go-style duration (90s, 5m, 1h)
    #[arg(long, default_value = "5m", value_parser = k8s::parse_duration)]
    pub(crate) interval: Duration,

    /// Additional namespace to protect from deletion (repeatable)
    #[arg(long = "protect", value_name = "NAMESPACE")]
    pub(crate) protect: Vec<String>,

    /// Run a single pass and exit
    #[arg(long)]
    pub(crate) once: bool,

    /// Serve GET /healthz on this address
    #[arg(long, value_name = "ADDR")]
    pub(crate) health_addr: Option<SocketAddr>,
}

impl Cli {
    pub(crate) fn config(&self) -> Config {
        self.protect.iter().fold(
            Config::default()
                .ttl_hours(self.ttl)
                .interval(self.interval)
                .namespace(&self.namespace),
            |config, namespace| config.protect(namespace),
        )
    }
}
