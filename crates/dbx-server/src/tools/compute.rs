//! Compute tools: clusters, instance pools, libraries and cluster policies.

use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::server::McpServer;
use crate::tools::respond;
use dbx_core::models::compute::{ClusterEventsRequest, LibrariesRequest};
use dbx_core::Result;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ClusterIdParams {
    /// Cluster ID
    pub cluster_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateClusterParams {
    /// Cluster specification (cluster_name, spark_version, node_type_id, ...)
    pub cluster_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct EditClusterParams {
    /// Cluster ID
    pub cluster_id: String,
    /// Full replacement cluster specification
    pub cluster_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ClusterEventsParams {
    /// Cluster ID
    pub cluster_id: String,
    /// Start of the event window (epoch millis, optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<i64>,
    /// End of the event window (epoch millis, optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<i64>,
    /// Sort order, ASC or DESC (default: DESC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<String>,
    /// Maximum number of events to return (default: 50)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct InstancePoolIdParams {
    /// Instance pool ID
    pub instance_pool_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateInstancePoolParams {
    /// Pool specification (instance_pool_name, node_type_id, ...)
    pub pool_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct EditInstancePoolParams {
    /// Instance pool ID
    pub instance_pool_id: String,
    /// Full replacement pool specification
    pub pool_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ClusterLibrariesParams {
    /// Cluster ID
    pub cluster_id: String,
    /// Library specs (jar, egg, whl, pypi, maven, cran)
    pub libraries: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct PolicyIdParams {
    /// Cluster policy ID
    pub policy_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreatePolicyParams {
    /// Policy specification (name, definition, ...)
    pub policy_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct EditPolicyParams {
    /// Cluster policy ID
    pub policy_id: String,
    /// Full replacement policy specification
    pub policy_config: Value,
}

#[tool_router(router = compute_router, vis = "pub(crate)")]
impl McpServer {
    // ─────────────────────────────────────────────────────────────────────────
    // Clusters
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all clusters in the workspace with state and configuration.")]
    async fn list_clusters(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_clusters().await?;
            let clusters = list.clusters.unwrap_or_default();
            let count = clusters.len();
            Ok(json!({
                "clusters": clusters,
                "count": count,
                "message": format!("Found {count} cluster(s)"),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get detailed information about a cluster by ID.")]
    async fn get_cluster(&self, Parameters(params): Parameters<ClusterIdParams>) -> String {
        let result: Result<Value> = async {
            let cluster = self.client.get_cluster(&params.cluster_id).await?;
            Ok(json!({ "cluster": cluster }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a new cluster from a cluster specification. Returns the new cluster ID.")]
    async fn create_cluster(&self, Parameters(params): Parameters<CreateClusterParams>) -> String {
        let result: Result<Value> = async {
            let created = self.client.create_cluster(&params.cluster_config).await?;
            Ok(json!({
                "cluster_id": created.cluster_id,
                "message": "Cluster created",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Start a terminated cluster.")]
    async fn start_cluster(&self, Parameters(params): Parameters<ClusterIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.start_cluster(&params.cluster_id).await?;
            Ok(json!({
                "cluster_id": params.cluster_id,
                "message": format!("Cluster {} is starting", params.cluster_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Restart a running cluster.")]
    async fn restart_cluster(&self, Parameters(params): Parameters<ClusterIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.restart_cluster(&params.cluster_id).await?;
            Ok(json!({
                "cluster_id": params.cluster_id,
                "message": format!("Cluster {} is restarting", params.cluster_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Terminate a running cluster. The cluster stays listed and can be started again.")]
    async fn terminate_cluster(&self, Parameters(params): Parameters<ClusterIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.terminate_cluster(&params.cluster_id).await?;
            Ok(json!({
                "cluster_id": params.cluster_id,
                "message": format!("Cluster {} is terminating", params.cluster_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Permanently delete a cluster. The cluster is removed from the workspace.")]
    async fn delete_cluster(&self, Parameters(params): Parameters<ClusterIdParams>) -> String {
        let result: Result<Value> = async {
            self.client
                .permanent_delete_cluster(&params.cluster_id)
                .await?;
            Ok(json!({
                "cluster_id": params.cluster_id,
                "message": format!("Cluster {} permanently deleted", params.cluster_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Edit a cluster's configuration. Requires the full replacement spec.")]
    async fn edit_cluster(&self, Parameters(params): Parameters<EditClusterParams>) -> String {
        let result: Result<Value> = async {
            self.client
                .edit_cluster(&params.cluster_id, &params.cluster_config)
                .await?;
            Ok(json!({
                "cluster_id": params.cluster_id,
                "message": format!("Cluster {} updated", params.cluster_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get events for a cluster (state changes, resizes, failures).")]
    async fn get_cluster_events(
        &self,
        Parameters(params): Parameters<ClusterEventsParams>,
    ) -> String {
        let result: Result<Value> = async {
            let request = ClusterEventsRequest {
                cluster_id: params.cluster_id.clone(),
                start_time: params.start_time,
                end_time: params.end_time,
                order: params.order.unwrap_or_else(|| "DESC".to_string()),
                limit: params.limit.unwrap_or(50),
            };
            let response = self.client.get_cluster_events(&request).await?;
            let events = response.events.unwrap_or_default();
            let count = events.len();
            Ok(json!({
                "cluster_id": params.cluster_id,
                "events": events,
                "count": count,
                "total_count": response.total_count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "List available node types for clusters.")]
    async fn list_node_types(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_node_types().await?;
            let node_types = list.node_types.unwrap_or_default();
            let count = node_types.len();
            Ok(json!({
                "node_types": node_types,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "List available Spark runtime versions for clusters.")]
    async fn list_spark_versions(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_spark_versions().await?;
            let versions = list.versions.unwrap_or_default();
            let count = versions.len();
            Ok(json!({
                "versions": versions,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Instance Pools
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all instance pools in the workspace.")]
    async fn list_instance_pools(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_instance_pools().await?;
            let pools = list.instance_pools.unwrap_or_default();
            let count = pools.len();
            Ok(json!({
                "instance_pools": pools,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get detailed information about an instance pool by ID.")]
    async fn get_instance_pool(
        &self,
        Parameters(params): Parameters<InstancePoolIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            let pool = self
                .client
                .get_instance_pool(&params.instance_pool_id)
                .await?;
            Ok(json!({ "instance_pool": pool }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a new instance pool. Returns the new pool ID.")]
    async fn create_instance_pool(
        &self,
        Parameters(params): Parameters<CreateInstancePoolParams>,
    ) -> String {
        let result: Result<Value> = async {
            let created = self.client.create_instance_pool(&params.pool_config).await?;
            Ok(json!({
                "instance_pool_id": created.instance_pool_id,
                "message": "Instance pool created",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Edit an instance pool's configuration. Requires the full replacement spec.")]
    async fn edit_instance_pool(
        &self,
        Parameters(params): Parameters<EditInstancePoolParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client
                .edit_instance_pool(&params.instance_pool_id, &params.pool_config)
                .await?;
            Ok(json!({
                "instance_pool_id": params.instance_pool_id,
                "message": format!("Instance pool {} updated", params.instance_pool_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete an instance pool.")]
    async fn delete_instance_pool(
        &self,
        Parameters(params): Parameters<InstancePoolIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client
                .delete_instance_pool(&params.instance_pool_id)
                .await?;
            Ok(json!({
                "instance_pool_id": params.instance_pool_id,
                "message": format!("Instance pool {} deleted", params.instance_pool_id),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Libraries
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List library installation status for a cluster.")]
    async fn list_cluster_libraries(
        &self,
        Parameters(params): Parameters<ClusterIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            let statuses = self.client.cluster_library_status(&params.cluster_id).await?;
            let libraries = statuses.library_statuses.unwrap_or_default();
            let count = libraries.len();
            Ok(json!({
                "cluster_id": params.cluster_id,
                "library_statuses": libraries,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "List library installation status for every cluster in the workspace.")]
    async fn list_all_cluster_libraries(&self) -> String {
        let result: Result<Value> = async {
            let all = self.client.all_cluster_library_statuses().await?;
            let statuses = all.statuses.unwrap_or_default();
            let count = statuses.len();
            Ok(json!({
                "statuses": statuses,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Install libraries on a cluster. Takes a list of library specs (pypi, maven, jar, whl).")]
    async fn install_cluster_libraries(
        &self,
        Parameters(params): Parameters<ClusterLibrariesParams>,
    ) -> String {
        let result: Result<Value> = async {
            let request = LibrariesRequest {
                cluster_id: params.cluster_id.clone(),
                libraries: params.libraries.clone(),
            };
            self.client.install_libraries(&request).await?;
            Ok(json!({
                "cluster_id": params.cluster_id,
                "libraries_requested": params.libraries.len(),
                "message": "Library installation requested",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Uninstall libraries from a cluster. Takes effect on cluster restart.")]
    async fn uninstall_cluster_libraries(
        &self,
        Parameters(params): Parameters<ClusterLibrariesParams>,
    ) -> String {
        let result: Result<Value> = async {
            let request = LibrariesRequest {
                cluster_id: params.cluster_id.clone(),
                libraries: params.libraries.clone(),
            };
            self.client.uninstall_libraries(&request).await?;
            Ok(json!({
                "cluster_id": params.cluster_id,
                "libraries_requested": params.libraries.len(),
                "message": "Library removal requested; takes effect on restart",
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Cluster Policies
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all cluster policies in the workspace.")]
    async fn list_cluster_policies(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_cluster_policies().await?;
            let policies = list.policies.unwrap_or_default();
            let count = policies.len();
            Ok(json!({
                "policies": policies,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a cluster policy by ID, including its definition.")]
    async fn get_cluster_policy(&self, Parameters(params): Parameters<PolicyIdParams>) -> String {
        let result: Result<Value> = async {
            let policy = self.client.get_cluster_policy(&params.policy_id).await?;
            Ok(json!({ "policy": policy }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a cluster policy. Returns the new policy ID.")]
    async fn create_cluster_policy(
        &self,
        Parameters(params): Parameters<CreatePolicyParams>,
    ) -> String {
        let result: Result<Value> = async {
            let created = self
                .client
                .create_cluster_policy(&params.policy_config)
                .await?;
            Ok(json!({
                "policy_id": created.policy_id,
                "message": "Cluster policy created",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Edit a cluster policy. Requires the full replacement spec.")]
    async fn edit_cluster_policy(&self, Parameters(params): Parameters<EditPolicyParams>) -> String {
        let result: Result<Value> = async {
            self.client
                .edit_cluster_policy(&params.policy_id, &params.policy_config)
                .await?;
            Ok(json!({
                "policy_id": params.policy_id,
                "message": format!("Cluster policy {} updated", params.policy_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a cluster policy.")]
    async fn delete_cluster_policy(
        &self,
        Parameters(params): Parameters<PolicyIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client.delete_cluster_policy(&params.policy_id).await?;
            Ok(json!({
                "policy_id": params.policy_id,
                "message": format!("Cluster policy {} deleted", params.policy_id),
            }))
        }
        .await;
        respond(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_params_default_shape() {
        let p: ClusterEventsParams = serde_json::from_value(json!({
            "cluster_id": "abc-123"
        }))
        .unwrap();
        assert_eq!(p.cluster_id, "abc-123");
        assert!(p.order.is_none());
        assert!(p.limit.is_none());
    }

    #[test]
    fn libraries_params_accept_specs() {
        let p: ClusterLibrariesParams = serde_json::from_value(json!({
            "cluster_id": "abc-123",
            "libraries": [{ "pypi": { "package": "requests" } }]
        }))
        .unwrap();
        assert_eq!(p.libraries.len(), 1);
    }
}
