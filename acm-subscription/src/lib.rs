use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use k8s_openapi::apimachinery::pkg::apis::meta::v1 as metav1;

pub mod v1;
