use constcat::concat;

use super::*;

pub use field::FieldError;

pub const SUBSCRIPTION_API_GROUP: &str = "apps.open-cluster-management.io";
pub const SUBSCRIPTION_API_VERSION: &str = "v1";
pub const SUBSCRIPTION_API_GROUP_VERSION: &str =
    concat!(SUBSCRIPTION_API_GROUP, "/", SUBSCRIPTION_API_VERSION);
pub const SUBSCRIPTION_KIND: &str = "Subscription";
pub const SUBSCRIPTION_PLURAL: &str = "subscriptions";

const SUBSCRIPTION_API_ROOT: &str = concat!("/apis/", SUBSCRIPTION_API_GROUP_VERSION);

mod field;

/// Collection path for subscriptions, cluster-wide when `namespace` is `None`.
pub fn url_path(namespace: Option<&str>) -> String {
    match namespace {
        Some(namespace) => {
            format!("{SUBSCRIPTION_API_ROOT}/namespaces/{namespace}/{SUBSCRIPTION_PLURAL}")
        }
        None => format!("{SUBSCRIPTION_API_ROOT}/{SUBSCRIPTION_PLURAL}"),
    }
}

/// `Subscription` is kept unstructured: only a handful of metadata fields
/// are ever read, and the rest of the object is carried as is.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subscription {
    object: Map<String, Value>,
}

impl Subscription {
    pub fn from_object(object: Map<String, Value>) -> Self {
        Self { object }
    }

    pub fn object(&self) -> &Map<String, Value> {
        &self.object
    }

    /// `metadata.name`
    pub fn name(&self) -> Result<&str, FieldError> {
        self.required_str(&["metadata", "name"])
    }

    /// `metadata.namespace`
    pub fn namespace(&self) -> Result<&str, FieldError> {
        self.required_str(&["metadata", "namespace"])
    }

    /// `metadata.creationTimestamp`, still in its RFC3339 wire form
    pub fn creation_timestamp(&self) -> Result<&str, FieldError> {
        self.required_str(&["metadata", "creationTimestamp"])
    }

    /// Looks up a string field by walking `path` through nested objects.
    pub fn nested_str(&self, path: &[&str]) -> Result<&str, FieldError> {
        field::lookup(&self.object, path)?
            .as_str()
            .ok_or_else(|| FieldError::not_a_string(path))
    }

    fn required_str(&self, path: &[&str]) -> Result<&str, FieldError> {
        match self.nested_str(path)? {
            "" => Err(FieldError::empty(path)),
            text => Ok(text),
        }
    }
}

/// `SubscriptionList` is what the API server returns for a list request.
/// The list metadata carries the `continue` token for paged listing.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionList {
    #[serde(default)]
    pub metadata: metav1::ListMeta,

    #[serde(default)]
    pub items: Vec<Subscription>,
}

impl SubscriptionList {
    /// Token for the next page, if the server has more items.
    pub fn continue_token(&self) -> Option<&str> {
        self.metadata
            .continue_
            .as_deref()
            .filter(|token| !token.is_empty())
    }
}
