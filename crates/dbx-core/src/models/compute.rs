//! Clusters, instance pools, libraries and cluster policies.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Response from `GET /api/2.1/clusters/list`
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterList {
    pub clusters: Option<Vec<Cluster>>,
}

/// A cluster as reported by the Clusters API.
///
/// Nested provider-specific blobs (autoscale, cloud attributes, disk spec)
/// are carried as raw JSON; this layer never interprets them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cluster {
    pub cluster_id: Option<String>,
    pub cluster_name: Option<String>,
    pub state: Option<String>,
    pub state_message: Option<String>,
    pub node_type_id: Option<String>,
    pub driver_node_type_id: Option<String>,
    pub num_workers: Option<i64>,
    pub autoscale: Option<Value>,
    pub spark_version: Option<String>,
    pub spark_conf: Option<HashMap<String, String>>,
    pub aws_attributes: Option<Value>,
    pub azure_attributes: Option<Value>,
    pub gcp_attributes: Option<Value>,
    pub cluster_source: Option<String>,
    pub creator_user_name: Option<String>,
    pub start_time: Option<i64>,
    pub terminated_time: Option<i64>,
    pub last_state_loss_time: Option<i64>,
    pub last_activity_time: Option<i64>,
    pub cluster_memory_mb: Option<i64>,
    pub cluster_cores: Option<f64>,
    pub default_tags: Option<HashMap<String, String>>,
    pub custom_tags: Option<HashMap<String, String>>,
    pub init_scripts: Option<Value>,
    pub enable_elastic_disk: Option<bool>,
    pub disk_spec: Option<Value>,
    pub cluster_log_conf: Option<Value>,
}

/// Response from `POST /api/2.1/clusters/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateClusterResponse {
    pub cluster_id: Option<String>,
}

/// Response from `POST /api/2.1/clusters/events`
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterEventsResponse {
    pub events: Option<Vec<ClusterEvent>>,
    pub next_page: Option<Value>,
    pub total_count: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterEvent {
    pub cluster_id: Option<String>,
    pub timestamp: Option<i64>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub details: Option<Value>,
}

/// Request body for `POST /api/2.1/clusters/events`
#[derive(Debug, Clone, Serialize)]
pub struct ClusterEventsRequest {
    pub cluster_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    pub order: String,
    pub limit: u32,
}

/// Response from `GET /api/2.0/instance-pools/list`
#[derive(Debug, Clone, Deserialize)]
pub struct InstancePoolList {
    pub instance_pools: Option<Vec<InstancePool>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstancePool {
    pub instance_pool_id: Option<String>,
    pub instance_pool_name: Option<String>,
    pub state: Option<String>,
    pub node_type_id: Option<String>,
    pub min_idle_instances: Option<i64>,
    pub max_capacity: Option<i64>,
    pub idle_instance_autotermination_minutes: Option<i64>,
    pub enable_elastic_disk: Option<bool>,
    pub disk_spec: Option<Value>,
    pub preloaded_spark_versions: Option<Vec<String>>,
    pub preloaded_docker_images: Option<Value>,
    pub aws_attributes: Option<Value>,
    pub azure_attributes: Option<Value>,
    pub gcp_attributes: Option<Value>,
    pub custom_tags: Option<HashMap<String, String>>,
    pub default_tags: Option<HashMap<String, String>>,
    pub stats: Option<Value>,
}

/// Response from `POST /api/2.0/instance-pools/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateInstancePoolResponse {
    pub instance_pool_id: Option<String>,
}

/// Response from `GET /api/2.0/libraries/cluster-status`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterLibraryStatuses {
    pub cluster_id: Option<String>,
    pub library_statuses: Option<Vec<LibraryFullStatus>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryFullStatus {
    pub library: Option<Value>,
    pub status: Option<String>,
    pub messages: Option<Vec<String>>,
    pub is_library_for_all_clusters: Option<bool>,
}

/// Response from `GET /api/2.0/libraries/all-cluster-statuses`
#[derive(Debug, Clone, Deserialize)]
pub struct AllClusterLibraryStatuses {
    pub statuses: Option<Vec<ClusterLibraryStatuses>>,
}

/// Request body for library install/uninstall.
#[derive(Debug, Clone, Serialize)]
pub struct LibrariesRequest {
    pub cluster_id: String,
    pub libraries: Vec<Value>,
}

/// Response from `GET /api/2.0/policies/clusters/list`
#[derive(Debug, Clone, Deserialize)]
pub struct PolicyList {
    pub policies: Option<Vec<Policy>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    pub policy_id: Option<String>,
    pub name: Option<String>,
    pub definition: Option<String>,
    pub created_at_timestamp: Option<i64>,
    pub is_default: Option<bool>,
    pub max_clusters_per_user: Option<i64>,
    pub policy_family_id: Option<String>,
    pub policy_family_definition_overrides: Option<String>,
}

/// Response from `POST /api/2.0/policies/clusters/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePolicyResponse {
    pub policy_id: Option<String>,
}

/// Response from `GET /api/2.1/clusters/list-node-types`
#[derive(Debug, Clone, Deserialize)]
pub struct NodeTypeList {
    pub node_types: Option<Vec<NodeType>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeType {
    pub node_type_id: Option<String>,
    pub memory_mb: Option<i64>,
    pub num_cores: Option<f64>,
    pub description: Option<String>,
    pub instance_type_id: Option<String>,
    pub is_deprecated: Option<bool>,
    pub category: Option<String>,
    pub support_ebs_volumes: Option<bool>,
    pub support_cluster_tags: Option<bool>,
    pub support_port_forwarding: Option<bool>,
    pub display_order: Option<i64>,
    pub node_info: Option<Value>,
}

/// Response from `GET /api/2.1/clusters/spark-versions`
#[derive(Debug, Clone, Deserialize)]
pub struct SparkVersionList {
    pub versions: Option<Vec<SparkVersion>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SparkVersion {
    pub key: Option<String>,
    pub name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cluster_missing_fields_deserialize_as_none() {
        let c: Cluster = serde_json::from_value(json!({
            "cluster_id": "abc-123",
            "state": "RUNNING"
        }))
        .unwrap();
        assert_eq!(c.cluster_id.as_deref(), Some("abc-123"));
        assert!(c.autoscale.is_none());
        assert!(c.num_workers.is_none());
    }

    #[test]
    fn cluster_absent_fields_serialize_as_null() {
        let c: Cluster = serde_json::from_value(json!({ "cluster_id": "abc" })).unwrap();
        let v = serde_json::to_value(&c).unwrap();
        let obj = v.as_object().unwrap();
        assert!(obj.contains_key("cluster_name"));
        assert!(obj["cluster_name"].is_null());
        assert!(obj.contains_key("spark_version"));
    }

    #[test]
    fn library_statuses_serialize_for_envelope_embedding() {
        let s: ClusterLibraryStatuses = serde_json::from_value(json!({
            "cluster_id": "abc-123",
            "library_statuses": [{
                "library": { "pypi": { "package": "requests" } },
                "status": "INSTALLED"
            }]
        }))
        .unwrap();
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["cluster_id"], "abc-123");
        assert_eq!(v["library_statuses"][0]["status"], "INSTALLED");
    }

    #[test]
    fn events_request_omits_unset_times() {
        let req = ClusterEventsRequest {
            cluster_id: "abc".into(),
            start_time: None,
            end_time: None,
            order: "DESC".into(),
            limit: 50,
        };
        let v = serde_json::to_value(&req).unwrap();
        let obj = v.as_object().unwrap();
        assert!(!obj.contains_key("start_time"));
        assert!(!obj.contains_key("end_time"));
        assert_eq!(obj["order"], "DESC");
    }

    #[test]
    fn event_type_field_renames() {
        let e: ClusterEvent = serde_json::from_value(json!({
            "cluster_id": "abc",
            "type": "RUNNING",
            "timestamp": 123
        }))
        .unwrap();
        assert_eq!(e.event_type.as_deref(), Some("RUNNING"));
    }
}
