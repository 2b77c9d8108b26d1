use std::collections::VecDeque;
use std::convert::Infallible;
use std::sync::Arc;
use std::sync::Mutex;

use http::Method;
use http_body_util::BodyExt as _;
use http::Request;
use http::Response;
use kube::client::Body;
use serde_json::Value;
use serde_json::json;

use super::*;

#[derive(Debug, Default, Clone)]
struct Recorded(Arc<Mutex<Vec<(Method, String, Vec<u8>)>>>);

impl Recorded {
    fn requests(&self) -> Vec<(Method, String)> {
        let requests = self.0.lock().unwrap();
        requests
            .iter()
            .map(|(method, uri, _)| (method.clone(), uri.clone()))
            .collect()
    }

    fn bodies(&self) -> Vec<Vec<u8>> {
        let requests = self.0.lock().unwrap();
        requests.iter().map(|(_, _, body)| body.clone()).collect()
    }
}

fn mock_api(responses: Vec<Value>, recorded: Recorded) -> KubeApi {
    let responses = Arc::new(Mutex::new(VecDeque::from(responses)));
    let service = tower::service_fn(move |request: Request<Body>| {
        let recorded = recorded.clone();
        let responses = Arc::clone(&responses);
        async move {
            let (parts, body) = request.into_parts();
            let body = body.collect().await.unwrap().to_bytes().to_vec();
            recorded
                .0
                .lock()
                .unwrap()
                .push((parts.method, parts.uri.to_string(), body));
            let body = responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| json!({}));
            let body = serde_json::to_vec(&body).unwrap();
            Ok::<_, Infallible>(Response::new(Body::from(body)))
        }
    });
    KubeApi::with_client(kube::Client::new(service, "default"))
}

fn subscription(name: &str, namespace: &str) -> Value {
    json!({
        "apiVersion": subscriptionv1::SUBSCRIPTION_API_GROUP_VERSION,
        "kind": subscriptionv1::SUBSCRIPTION_KIND,
        "metadata": {
            "name": name,
            "namespace": namespace,
            "creationTimestamp": "2024-01-01T00:00:00Z",
        },
    })
}

#[tokio::test]
async fn list_cluster_wide() {
    let recorded = Recorded::default();
    let api = mock_api(
        vec![json!({
            "metadata": {},
            "items": [subscription("a", "default"), subscription("b", "team-a")],
        })],
        recorded.clone(),
    );

    let items = api.list_subscriptions(None).await.unwrap();

    assert_eq!(items.len(), 2);
    assert_eq!(items[1].namespace(), Ok("team-a"));

    let requests = recorded.requests();
    assert_eq!(requests.len(), 1);
    let (method, uri) = &requests[0];
    assert_eq!(*method, Method::GET);
    assert!(uri.starts_with("/apis/apps.open-cluster-management.io/v1/subscriptions?"));
    assert!(uri.contains("limit=500"));
}

#[tokio::test]
async fn list_follows_continue_tokens() {
    let recorded = Recorded::default();
    let api = mock_api(
        vec![
            json!({
                "metadata": { "continue": "page-2" },
                "items": [subscription("a", "team-a")],
            }),
            json!({
                "metadata": { "continue": "" },
                "items": [subscription("b", "team-a"), subscription("c", "team-a")],
            }),
        ],
        recorded.clone(),
    );

    let items = api.list_subscriptions(Some("team-a")).await.unwrap();

    let names = items
        .iter()
        .map(|item| item.name().unwrap())
        .collect::<Vec<_>>();
    assert_eq!(names, ["a", "b", "c"]);

    let requests = recorded.requests();
    assert_eq!(requests.len(), 2);
    assert!(
        requests[0]
            .1
            .starts_with("/apis/apps.open-cluster-management.io/v1/namespaces/team-a/subscriptions?")
    );
    assert!(!requests[0].1.contains("continue="));
    assert!(requests[1].1.contains("continue=page-2"));
}

#[tokio::test]
async fn delete_targets_named_subscription() {
    let recorded = Recorded::default();
    let api = mock_api(vec![json!({ "kind": "Status", "status": "Success" })], recorded.clone());

    api.delete_subscription("team-a", "nginx-sub").await.unwrap();

    let requests = recorded.requests();
    assert_eq!(requests.len(), 1);
    let (method, uri) = &requests[0];
    assert_eq!(*method, Method::DELETE);
    assert!(uri.starts_with(
        "/apis/apps.open-cluster-management.io/v1/namespaces/team-a/subscriptions/nginx-sub"
    ));
}

#[tokio::test]
async fn delete_sends_foreground_propagation() {
    let recorded = Recorded::default();
    let api = mock_api(vec![json!({ "kind": "Status", "status": "Success" })], recorded.clone());

    api.delete_subscription("team-a", "nginx-sub").await.unwrap();

    let bodies = recorded.bodies();
    assert_eq!(bodies.len(), 1);
    let body: Value = serde_json::from_slice(&bodies[0]).unwrap();
    assert_eq!(body, json!({ "propagationPolicy": "Foreground" }));
}

#[tokio::test]
async fn list_sends_no_body() {
    let recorded = Recorded::default();
    let api = mock_api(vec![json!({ "items": [] })], recorded.clone());

    api.list_subscriptions(None).await.unwrap();

    assert_eq!(recorded.bodies(), [Vec::<u8>::new()]);
}

#[tokio::test]
async fn debug_redacts_client() {
    let api = mock_api(Vec::new(), Recorded::default());
    let debug = format!("{api:?}");
    assert!(debug.contains("list_params"));
    assert!(debug.contains("delete_params"));
    assert!(debug.contains("<kube::Client>"));
    assert!(debug.contains("Foreground"));
}
