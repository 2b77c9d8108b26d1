use std::fmt::Debug;
use std::path::Path;

use kube::config::KubeConfigOptions;
use kube::config::Kubeconfig;
use kube::config::KubeconfigError;
use subscription_reaper_ext as k8s;

use k8s::api;
use k8s::subscriptionv1;
use k8s::subscriptionv1::Subscription;
use k8s::subscriptionv1::SubscriptionList;

/// Page size for subscription listing.
const LIST_PAGE_SIZE: u32 = 500;

#[derive(Debug, thiserror::Error)]
pub enum KubeApiError {
    #[error("failed to load cluster credentials")]
    Kubeconfig(#[from] KubeconfigError),

    #[error("failed to create the kubernetes client")]
    Client(#[from] kube::Error),
}

pub struct KubeApi {
    list_params: api::ListParams,
    delete_params: api::DeleteParams,
    client: kube::Client,
}

impl KubeApi {
    /// Create a KubeApi from the first usable set of cluster credentials.
    ///
    /// In-cluster service account credentials are tried first. When they are
    /// unavailable the kubeconfig at `kubeconfig` is used, or the client's
    /// default kubeconfig discovery when no path is given.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # async fn run() -> Result<(), subscription_reaper_kubeapi::KubeApiError> {
    /// let api = subscription_reaper_kubeapi::KubeApi::new(None).await?;
    /// let _subscriptions = api.list_subscriptions(Some("default")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn new(kubeconfig: Option<&Path>) -> Result<Self, KubeApiError> {
        let config = cluster_config(kubeconfig).await?;
        let client = kube::Client::try_from(config)?;
        Ok(Self::with_client(client))
    }

    /// Create a KubeApi backed by the provided Kubernetes client.
    ///
    /// Listing is paged and deletion always uses foreground propagation, so
    /// dependents are gone before the subscription itself disappears.
    pub fn with_client(client: kube::Client) -> Self {
        Self {
            list_params: api::ListParams::default().limit(LIST_PAGE_SIZE),
            delete_params: api::DeleteParams::foreground(),
            client,
        }
    }

    /// Lists every subscription in `namespace`, or in all namespaces for `None`.
    ///
    /// Pages are requested until the server stops handing out a `continue`
    /// token, and the items of all pages are returned together.
    pub async fn list_subscriptions(
        &self,
        namespace: Option<&str>,
    ) -> kube::Result<Vec<Subscription>> {
        let request = api::Request::new(subscriptionv1::url_path(namespace));
        let mut lp = self.list_params().clone();
        let mut items = Vec::new();

        loop {
            let page = request.list(&lp).map_err(kube::Error::BuildRequest)?;
            let page = self.client.request::<SubscriptionList>(page).await?;
            let next = page.continue_token().map(str::to_string);
            items.extend(page.items);
            match next {
                Some(token) => {
                    tracing::debug!(fetched = items.len(), "Fetching next page of subscriptions");
                    lp = lp.continue_token(&token);
                }
                None => break,
            }
        }

        Ok(items)
    }

    /// Deletes one subscription with foreground cascade propagation.
    ///
    /// The response body (either the terminating object or a `Status`) is
    /// not inspected.
    pub async fn delete_subscription(&self, namespace: &str, name: &str) -> kube::Result<()> {
        let dp = self.delete_params();
        let request = api::Request::new(subscriptionv1::url_path(Some(namespace)))
            .delete(name, dp)
            .map_err(kube::Error::BuildRequest)?;
        self.client.request_text(request).await.map(|_| ())
    }

    fn list_params(&self) -> &api::ListParams {
        &self.list_params
    }

    fn delete_params(&self) -> &api::DeleteParams {
        &self.delete_params
    }
}

impl Debug for KubeApi {
    /// Formats the `KubeApi` for debugging, showing `list_params` and `delete_params` while redacting the `client`.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KubeApi")
            .field("list_params", &self.list_params)
            .field("delete_params", &self.delete_params)
            .field("client", &"<kube::Client>")
            .finish()
    }
}

async fn cluster_config(kubeconfig: Option<&Path>) -> Result<kube::Config, KubeApiError> {
    match kube::Config::incluster() {
        Ok(config) => {
            tracing::info!("Using in-cluster credentials");
            return Ok(config);
        }
        Err(err) => {
            tracing::info!(?err, "In-cluster credentials unavailable, falling back to kubeconfig");
        }
    }

    let options = KubeConfigOptions::default();
    let config = match kubeconfig {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading kubeconfig");
            let kubeconfig = Kubeconfig::read_from(path)?;
            kube::Config::from_custom_kubeconfig(kubeconfig, &options).await?
        }
        None => kube::Config::from_kubeconfig(&options).await?,
    };
    Ok(config)
}

#[cfg(test)]
mod tests;
