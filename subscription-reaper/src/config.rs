use std::collections::BTreeSet;
use std::time::Duration;

use time::ext::NumericalStdDuration as _;

pub const DEFAULT_TTL_HOURS: u32 = 24;
pub const DEFAULT_PROTECTED_NAMESPACES: [&str; 2] = ["kube-system", "open-cluster-management"];

/// Namespaces whose subscriptions are never deleted, whatever their age.
///
/// Membership is an exact, case-sensitive match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProtectedNamespaces(BTreeSet<String>);

impl ProtectedNamespaces {
    pub fn new<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self(namespaces.into_iter().map(|ns| ns.to_string()).collect())
    }

    pub fn contains(&self, namespace: &str) -> bool {
        self.0.contains(namespace)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    fn insert(&mut self, namespace: impl ToString) {
        self.0.insert(namespace.to_string());
    }
}

impl Default for ProtectedNamespaces {
    fn default() -> Self {
        Self::new(DEFAULT_PROTECTED_NAMESPACES)
    }
}

/// Settings for [`SubscriptionReaper`](crate::SubscriptionReaper), fixed once the reaper is built.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    ttl_hours: u32,
    interval: Duration,
    namespace: Option<String>,
    protected: ProtectedNamespaces,
}

impl Config {
    /// Subscriptions at least this many whole hours old are deleted.
    pub fn ttl_hours(self, ttl_hours: u32) -> Self {
        Self { ttl_hours, ..self }
    }

    /// Pause between the end of one pass and the start of the next.
    pub fn interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    /// Restrict the reaper to one namespace. An empty name means all namespaces.
    pub fn namespace(self, namespace: impl ToString) -> Self {
        let namespace = Some(namespace.to_string()).filter(|ns| !ns.is_empty());
        Self { namespace, ..self }
    }

    /// Add a namespace to the protected set.
    pub fn protect(mut self, namespace: impl ToString) -> Self {
        self.protected.insert(namespace);
        self
    }

    pub fn ttl(&self) -> u32 {
        self.ttl_hours
    }

    pub fn poll_interval(&self) -> Duration {
        self.interval
    }

    pub fn namespace_scope(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    pub fn protected(&self) -> &ProtectedNamespaces {
        &self.protected
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl_hours: DEFAULT_TTL_HOURS,
            interval: 5.std_minutes(),
            namespace: None,
            protected: ProtectedNamespaces::default(),
        }
    }
}
