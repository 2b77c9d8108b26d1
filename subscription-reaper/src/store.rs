use super::*;

/// Where subscriptions are listed from and deleted in.
///
/// [`KubeApi`] is the production implementation; the reaper only ever needs
/// these two calls.
pub trait SubscriptionStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Every subscription in `namespace`, or cluster-wide for `None`.
    fn list(
        &self,
        namespace: Option<&str>,
    ) -> impl Future<Output = Result<Vec<Subscription>, Self::Error>> + Send;

    /// Delete one subscription with foreground cascade propagation.
    fn delete(
        &self,
        namespace: &str,
        name: &str,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}

impl SubscriptionStore for KubeApi {
    type Error = kube::Error;

    async fn list(&self, namespace: Option<&str>) -> kube::Result<Vec<Subscription>> {
        self.list_subscriptions(namespace).await
    }

    async fn delete(&self, namespace: &str, name: &str) -> kube::Result<()> {
        self.delete_subscription(namespace, name).await
    }
}
