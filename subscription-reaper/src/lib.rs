use std::pin::pin;

use subscription_reaper_ext as k8s;
use subscription_reaper_kubeapi::KubeApi;
use time::OffsetDateTime;

use k8s::SubscriptionExt as _;
use k8s::TimeExt as _;
use k8s::TimestampError;
use k8s::subscriptionv1::FieldError;
use k8s::subscriptionv1::Subscription;

pub use config::Config;
pub use config::DEFAULT_PROTECTED_NAMESPACES;
pub use config::DEFAULT_TTL_HOURS;
pub use config::ProtectedNamespaces;
pub use store::SubscriptionStore;

mod config;
mod store;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that end the reaper. Anything that goes wrong with a single
/// subscription is logged and counted in the [`PassSummary`] instead.
#[derive(Debug, thiserror::Error)]
pub enum ReapError {
    #[error("failed to list subscriptions")]
    List(#[source] BoxError),
}

/// Outcome of judging one subscription against the TTL.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Younger than the TTL.
    Retain { age_hours: i64 },
    /// Old enough to delete but sitting in a protected namespace.
    Protected { age_hours: i64 },
    /// Old enough to delete.
    Expired { age_hours: i64 },
}

impl Verdict {
    pub fn age_hours(&self) -> i64 {
        match self {
            Self::Retain { age_hours }
            | Self::Protected { age_hours }
            | Self::Expired { age_hours } => *age_hours,
        }
    }
}

/// Per-pass counters. `listed` is always the sum of the other fields.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub listed: usize,
    pub retained: usize,
    pub protected: usize,
    pub deleted: usize,
    pub failed: usize,
    pub skipped: usize,
}

#[derive(Debug, thiserror::Error)]
enum UnusableSubscription {
    #[error(transparent)]
    Field(#[from] FieldError),

    #[error(transparent)]
    Timestamp(#[from] TimestampError),
}

#[derive(Debug)]
pub struct SubscriptionReaper<S> {
    store: S,
    config: Config,
}

impl<S: SubscriptionStore> SubscriptionReaper<S> {
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Reaps forever, pausing `poll_interval` between passes, until
    /// `shutdown` completes.
    ///
    /// Shutdown is only observed between passes; a pass that has started
    /// always runs to the end. A list failure ends the run with an error.
    pub async fn run(&self, shutdown: impl Future<Output = ()>) -> Result<(), ReapError> {
        let mut shutdown = pin!(shutdown);
        tracing::info!(
            namespace = self.scope(),
            ttl_hours = self.config.ttl(),
            interval = ?self.config.poll_interval(),
            protected = ?self.config.protected(),
            "Starting subscription reaper"
        );

        loop {
            self.reap().await?;
            tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!("Stopping subscription reaper");
                    return Ok(());
                }
                () = tokio::time::sleep(self.config.poll_interval()) => {}
            }
        }
    }

    /// One pass over the current subscriptions, judged against the current time.
    pub async fn reap(&self) -> Result<PassSummary, ReapError> {
        self.reap_at(OffsetDateTime::now_utc()).await
    }

    /// One pass over the current subscriptions, judged against `now`.
    pub async fn reap_at(&self, now: OffsetDateTime) -> Result<PassSummary, ReapError> {
        tracing::info!(namespace = self.scope(), "Listing subscriptions");
        let items = self
            .store
            .list(self.config.namespace_scope())
            .await
            .map_err(|err| ReapError::List(err.into()))?;

        let mut summary = PassSummary {
            listed: items.len(),
            ..k8s::default()
        };
        for item in &items {
            self.reap_one(item, now, &mut summary).await;
        }

        tracing::info!(
            listed = summary.listed,
            retained = summary.retained,
            protected = summary.protected,
            deleted = summary.deleted,
            failed = summary.failed,
            skipped = summary.skipped,
            "Finished reaping pass"
        );
        Ok(summary)
    }

    /// Judge a subscription in `namespace` created at `created`, as seen at `now`.
    ///
    /// Age is counted in whole hours and truncated, so a subscription one
    /// second short of the TTL is still retained.
    pub fn evaluate(&self, namespace: &str, created: OffsetDateTime, now: OffsetDateTime) -> Verdict {
        let age_hours = now.whole_hours_since(&created);
        if age_hours < i64::from(self.config.ttl()) {
            Verdict::Retain { age_hours }
        } else if self.config.protected().contains(namespace) {
            Verdict::Protected { age_hours }
        } else {
            Verdict::Expired { age_hours }
        }
    }

    async fn reap_one(&self, item: &Subscription, now: OffsetDateTime, summary: &mut PassSummary) {
        let (name, namespace, created) = match identify(item) {
            Ok(fields) => fields,
            Err(err) => {
                let (name, namespace) = locate(item);
                tracing::warn!(
                    name,
                    namespace,
                    %err,
                    "Skipping subscription with unusable metadata"
                );
                summary.skipped += 1;
                return;
            }
        };

        let verdict = self.evaluate(namespace, created, now);
        let age_hours = verdict.age_hours();
        tracing::debug!(
            name,
            namespace,
            created = %created.to_rfc3339(),
            now = %now.to_rfc3339(),
            age_hours,
            "Found subscription"
        );

        match verdict {
            Verdict::Retain { .. } => summary.retained += 1,
            Verdict::Protected { .. } => {
                tracing::info!(
                    name,
                    namespace,
                    age_hours,
                    "Subscription is in a protected namespace, skipping deletion"
                );
                summary.protected += 1;
            }
            Verdict::Expired { .. } => match self.store.delete(namespace, name).await {
                Ok(()) => {
                    tracing::info!(name, namespace, age_hours, "Deleted subscription");
                    summary.deleted += 1;
                }
                Err(err) => {
                    tracing::error!(name, namespace, ?err, "Failed to delete subscription");
                    summary.failed += 1;
                }
            },
        }
    }

    fn scope(&self) -> &str {
        self.config.namespace_scope().unwrap_or("<all>")
    }
}

/// Whatever of name and namespace can be read, for logging items that are skipped.
fn locate(item: &Subscription) -> (&str, Option<&str>) {
    (item.name().unwrap_or("<unknown>"), item.namespace().ok())
}

fn identify(item: &Subscription) -> Result<(&str, &str, OffsetDateTime), UnusableSubscription> {
    let name = item.name()?;
    let namespace = item.namespace()?;
    let created = item.created_at()?;
    Ok((name, namespace, created))
}
