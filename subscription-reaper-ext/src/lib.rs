pub use acm_subscription::v1 as subscriptionv1;
pub use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;
pub use kube::api;

pub use duration::DurationError;
pub use duration::parse_duration;
pub use timestamp::TimeExt;
pub use timestamp::TimestampError;

use ::time::OffsetDateTime;
use serde_json::Map;
use serde_json::Value;
use serde_json::json;

mod duration;
mod timestamp;

pub trait SubscriptionExt {
    fn new(name: impl ToString, namespace: impl ToString) -> Self;
    fn created(self, ts: impl AsRef<str>) -> Self;
    fn created_at(&self) -> Result<OffsetDateTime, TimestampError>;
}

impl SubscriptionExt for subscriptionv1::Subscription {
    fn new(name: impl ToString, namespace: impl ToString) -> Self {
        let metadata = Map::from_iter([
            ("name".to_string(), json!(name.to_string())),
            ("namespace".to_string(), json!(namespace.to_string())),
        ]);
        let object = Map::from_iter([
            (
                "apiVersion".to_string(),
                json!(subscriptionv1::SUBSCRIPTION_API_GROUP_VERSION),
            ),
            ("kind".to_string(), json!(subscriptionv1::SUBSCRIPTION_KIND)),
            ("metadata".to_string(), Value::Object(metadata)),
        ]);
        Self::from_object(object)
    }

    fn created(self, ts: impl AsRef<str>) -> Self {
        let mut object = self.object().clone();
        if let Some(Value::Object(metadata)) = object.get_mut("metadata") {
            metadata.insert("creationTimestamp".to_string(), json!(ts.as_ref()));
        }
        Self::from_object(object)
    }

    /// Parsed `metadata.creationTimestamp`.
    ///
    /// Fails when the field is absent, not a string, or not RFC3339.
    fn created_at(&self) -> Result<OffsetDateTime, TimestampError> {
        let text = self.creation_timestamp()?;
        OffsetDateTime::parse_rfc3339(text)
    }
}

pub fn default<T: Default>() -> T {
    T::default()
}

#[cfg(test)]
mod tests {
    use ::time::macros::datetime;

    use super::*;

    use super::subscriptionv1::Subscription;

    #[test]
    fn new_subscription() {
        let sub = Subscription::new("nginx-sub", "default");
        assert_eq!(sub.name(), Ok("nginx-sub"));
        assert_eq!(sub.namespace(), Ok("default"));
        assert!(sub.creation_timestamp().is_err());
    }

    #[test]
    fn created_at() {
        let sub = Subscription::new("nginx-sub", "default").created("2024-01-01T00:00:00Z");
        assert_eq!(sub.created_at().unwrap(), datetime!(2024-01-01 00:00:00 UTC));
    }

    #[test]
    fn created_at_missing() {
        let sub = Subscription::new("nginx-sub", "default");
        let err = sub.created_at().unwrap_err();
        assert!(matches!(err, TimestampError::Field(_)));
    }

    #[test]
    fn created_at_malformed() {
        let sub = Subscription::new("nginx-sub", "default").created("2024-13-45");
        let err = sub.created_at().unwrap_err();
        assert!(matches!(err, TimestampError::Parse { .. }));
    }
}
