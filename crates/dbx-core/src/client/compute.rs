//! Clusters, instance pools, libraries and cluster policy operations.

use super::WorkspaceClient;
use crate::error::Result;
use crate::models::compute::*;
use serde_json::{json, Value};

impl WorkspaceClient {
    // ─────────────────────────────────────────────────────────────────────────
    // Clusters
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_clusters(&self) -> Result<ClusterList> {
        self.get("/api/2.1/clusters/list").await
    }

    pub async fn get_cluster(&self, cluster_id: &str) -> Result<Cluster> {
        self.get_query("/api/2.1/clusters/get", &[("cluster_id", cluster_id.into())])
            .await
    }

    /// Create a cluster from a raw cluster spec.
    ///
    /// The spec is passed through untouched; the Clusters API validates it.
    pub async fn create_cluster(&self, cluster_config: &Value) -> Result<CreateClusterResponse> {
        self.post("/api/2.1/clusters/create", cluster_config).await
    }

    pub async fn start_cluster(&self, cluster_id: &str) -> Result<Value> {
        self.post("/api/2.1/clusters/start", &json!({ "cluster_id": cluster_id }))
            .await
    }

    pub async fn restart_cluster(&self, cluster_id: &str) -> Result<Value> {
        self.post("/api/2.1/clusters/restart", &json!({ "cluster_id": cluster_id }))
            .await
    }

    /// Terminate a running cluster. The cluster stays listed and can be
    /// started again.
    pub async fn terminate_cluster(&self, cluster_id: &str) -> Result<Value> {
        self.post("/api/2.1/clusters/delete", &json!({ "cluster_id": cluster_id }))
            .await
    }

    /// Permanently remove a cluster from the workspace.
    pub async fn permanent_delete_cluster(&self, cluster_id: &str) -> Result<Value> {
        self.post(
            "/api/2.1/clusters/permanent-delete",
            &json!({ "cluster_id": cluster_id }),
        )
        .await
    }

    /// Edit a cluster. The API requires the full spec; `cluster_id` is merged
    /// into the caller-supplied config.
    pub async fn edit_cluster(&self, cluster_id: &str, cluster_config: &Value) -> Result<Value> {
        let mut body = cluster_config.clone();
        if let Some(obj) = body.as_object_mut() {
            obj.insert("cluster_id".into(), json!(cluster_id));
        }
        self.post("/api/2.1/clusters/edit", &body).await
    }

    pub async fn get_cluster_events(
        &self,
        req: &ClusterEventsRequest,
    ) -> Result<ClusterEventsResponse> {
        self.post("/api/2.1/clusters/events", req).await
    }

    pub async fn list_node_types(&self) -> Result<NodeTypeList> {
        self.get("/api/2.1/clusters/list-node-types").await
    }

    pub async fn list_spark_versions(&self) -> Result<SparkVersionList> {
        self.get("/api/2.1/clusters/spark-versions").await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Instance Pools
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_instance_pools(&self) -> Result<InstancePoolList> {
        self.get("/api/2.0/instance-pools/list").await
    }

    pub async fn get_instance_pool(&self, instance_pool_id: &str) -> Result<InstancePool> {
        self.get_query(
            "/api/2.0/instance-pools/get",
            &[("instance_pool_id", instance_pool_id.into())],
        )
        .await
    }

    pub async fn create_instance_pool(
        &self,
        pool_config: &Value,
    ) -> Result<CreateInstancePoolResponse> {
        self.post("/api/2.0/instance-pools/create", pool_config)
            .await
    }

    pub async fn edit_instance_pool(
        &self,
        instance_pool_id: &str,
        pool_config: &Value,
    ) -> Result<Value> {
        let mut body = pool_config.clone();
        if let Some(obj) = body.as_object_mut() {
            obj.insert("instance_pool_id".into(), json!(instance_pool_id));
        }
        self.post("/api/2.0/instance-pools/edit", &body).await
    }

    pub async fn delete_instance_pool(&self, instance_pool_id: &str) -> Result<Value> {
        self.post(
            "/api/2.0/instance-pools/delete",
            &json!({ "instance_pool_id": instance_pool_id }),
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Libraries
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn cluster_library_status(&self, cluster_id: &str) -> Result<ClusterLibraryStatuses> {
        self.get_query(
            "/api/2.0/libraries/cluster-status",
            &[("cluster_id", cluster_id.into())],
        )
        .await
    }

    pub async fn all_cluster_library_statuses(&self) -> Result<AllClusterLibraryStatuses> {
        self.get("/api/2.0/libraries/all-cluster-statuses").await
    }

    pub async fn install_libraries(&self, req: &LibrariesRequest) -> Result<Value> {
        self.post("/api/2.0/libraries/install", req).await
    }

    pub async fn uninstall_libraries(&self, req: &LibrariesRequest) -> Result<Value> {
        self.post("/api/2.0/libraries/uninstall", req).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cluster Policies
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_cluster_policies(&self) -> Result<PolicyList> {
        self.get("/api/2.0/policies/clusters/list").await
    }

    pub async fn get_cluster_policy(&self, policy_id: &str) -> Result<Policy> {
        self.get_query(
            "/api/2.0/policies/clusters/get",
            &[("policy_id", policy_id.into())],
        )
        .await
    }

    pub async fn create_cluster_policy(&self, policy_config: &Value) -> Result<CreatePolicyResponse> {
        self.post("/api/2.0/policies/clusters/create", policy_config)
            .await
    }

    pub async fn edit_cluster_policy(&self, policy_id: &str, policy_config: &Value) -> Result<Value> {
        let mut body = policy_config.clone();
        if let Some(obj) = body.as_object_mut() {
            obj.insert("policy_id".into(), json!(policy_id));
        }
        self.post("/api/2.0/policies/clusters/edit", &body).await
    }

    pub async fn delete_cluster_policy(&self, policy_id: &str) -> Result<Value> {
        self.post(
            "/api/2.0/policies/clusters/delete",
            &json!({ "policy_id": policy_id }),
        )
        .await
    }
}
