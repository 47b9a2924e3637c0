//! Workspace tools: object tree, import/export, repos, permissions and
//! workspace-wide settings.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::warn;

use crate::server::McpServer;
use crate::tools::respond;
use dbx_core::models::workspace::{AccessControlRequest, ImportRequest, UpdateRepoRequest};
use dbx_core::Result;

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ListObjectsParams {
    /// Workspace path to list (default: "/")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ObjectPathParams {
    /// Workspace path
    pub path: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ExportObjectParams {
    /// Workspace path to export
    pub path: String,
    /// Export format: SOURCE, HTML, JUPYTER or DBC (default: SOURCE)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ImportObjectParams {
    /// Workspace path to import to
    pub path: String,
    /// Content to import (plain text)
    pub content: String,
    /// Language: PYTHON, SCALA, SQL or R (default: PYTHON)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Import format: SOURCE, HTML, JUPYTER or DBC (default: SOURCE)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Overwrite an existing object (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct DeleteObjectParams {
    /// Workspace path to delete
    pub path: String,
    /// Delete directories recursively (default: false)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct RepoIdParams {
    /// Repo ID
    pub repo_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateRepoParams {
    /// Repo spec (url, provider, path)
    pub repo_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UpdateRepoParams {
    /// Repo ID
    pub repo_id: String,
    /// Branch to check out
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// Tag to check out (mutually exclusive with branch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct RepoPermissionsParams {
    /// Repo ID
    pub repo_id: String,
    /// Access control entries ({user_name|group_name|service_principal_name, permission_level})
    pub access_control_list: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ObjectPermissionsParams {
    /// Securable object type (repos, notebooks, directories, clusters, ...)
    pub workspace_object_type: String,
    /// Object ID
    pub workspace_object_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct SetObjectPermissionsParams {
    /// Securable object type (repos, notebooks, directories, clusters, ...)
    pub workspace_object_type: String,
    /// Object ID
    pub workspace_object_id: String,
    /// Access control entries ({user_name|group_name|service_principal_name, permission_level})
    pub access_control_list: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ConfEntriesParams {
    /// Workspace-conf entries to apply (key -> value)
    pub settings: HashMap<String, String>,
}

#[tool_router(router = workspace_router, vis = "pub(crate)")]
impl McpServer {
    // ─────────────────────────────────────────────────────────────────────────
    // Workspace Objects
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List notebooks, directories and files at a workspace path.")]
    async fn list_workspace_objects(
        &self,
        Parameters(params): Parameters<ListObjectsParams>,
    ) -> String {
        let path = params.path.unwrap_or_else(|| "/".to_string());
        let result: Result<Value> = async {
            let list = self.client.list_workspace_objects(&path).await?;
            let objects = list.objects.unwrap_or_default();
            let count = objects.len();
            Ok(json!({
                "path": path,
                "objects": objects,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get status and metadata of a workspace object by path.")]
    async fn get_workspace_object(
        &self,
        Parameters(params): Parameters<ObjectPathParams>,
    ) -> String {
        let result: Result<Value> = async {
            let object = self
                .client
                .get_workspace_object_status(&params.path)
                .await?;
            Ok(json!({ "object": object }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Export a workspace object. SOURCE format is decoded to text; other formats stay base64.")]
    async fn export_workspace_object(
        &self,
        Parameters(params): Parameters<ExportObjectParams>,
    ) -> String {
        let format = params.format.unwrap_or_else(|| "SOURCE".to_string());
        let result: Result<Value> = async {
            let response = self
                .client
                .export_workspace_object(&params.path, &format)
                .await?;
            let raw = response.content.unwrap_or_default();

            // The API always returns base64. SOURCE exports are text, so hand
            // those back decoded; anything else is left base64-encoded.
            let (content, content_type, size) = match BASE64.decode(&raw) {
                Ok(bytes) if format == "SOURCE" => match String::from_utf8(bytes) {
                    Ok(text) => {
                        let size = text.len();
                        (text, "text", size)
                    }
                    Err(e) => {
                        let size = e.as_bytes().len();
                        (raw.clone(), "base64", size)
                    }
                },
                Ok(bytes) => {
                    let size = bytes.len();
                    (raw.clone(), "base64", size)
                }
                Err(_) => {
                    let size = raw.len();
                    (raw.clone(), "base64", size)
                }
            };

            Ok(json!({
                "path": params.path,
                "format": format,
                "content": content,
                "content_type": content_type,
                "size": size,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Import text content to a workspace path as a notebook or file.")]
    async fn import_workspace_object(
        &self,
        Parameters(params): Parameters<ImportObjectParams>,
    ) -> String {
        let language = params.language.unwrap_or_else(|| "PYTHON".to_string());
        let format = params.format.unwrap_or_else(|| "SOURCE".to_string());
        let overwrite = params.overwrite.unwrap_or(false);
        let result: Result<Value> = async {
            let content_size = params.content.len();
            let request = ImportRequest {
                path: params.path.clone(),
                content: BASE64.encode(params.content.as_bytes()),
                language: Some(language.clone()),
                format: format.clone(),
                overwrite,
            };
            self.client.import_workspace_object(&request).await?;
            Ok(json!({
                "path": params.path,
                "language": language,
                "format": format,
                "overwrite": overwrite,
                "content_size": content_size,
                "message": format!("Content imported successfully to {}", params.path),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a workspace object, optionally recursively for directories.")]
    async fn delete_workspace_object(
        &self,
        Parameters(params): Parameters<DeleteObjectParams>,
    ) -> String {
        let recursive = params.recursive.unwrap_or(false);
        let result: Result<Value> = async {
            self.client
                .delete_workspace_object(&params.path, recursive)
                .await?;
            Ok(json!({
                "path": params.path,
                "recursive": recursive,
                "message": format!("Deleted {}", params.path),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a workspace directory, including missing parents.")]
    async fn create_workspace_directory(
        &self,
        Parameters(params): Parameters<ObjectPathParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client.create_workspace_directory(&params.path).await?;
            Ok(json!({
                "path": params.path,
                "message": format!("Directory {} created", params.path),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Repos
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all repos checked out in the workspace.")]
    async fn list_repos(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_repos().await?;
            let repos = list.repos.unwrap_or_default();
            let count = repos.len();
            Ok(json!({
                "repos": repos,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a repo by ID.")]
    async fn get_repo(&self, Parameters(params): Parameters<RepoIdParams>) -> String {
        let result: Result<Value> = async {
            let repo = self.client.get_repo(&params.repo_id).await?;
            Ok(json!({ "repo": repo }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Check out a Git repo into the workspace. Spec needs url, provider and path.")]
    async fn create_repo(&self, Parameters(params): Parameters<CreateRepoParams>) -> String {
        let result: Result<Value> = async {
            let repo = self.client.create_repo(&params.repo_config).await?;
            Ok(json!({
                "repo": repo,
                "message": "Repo created",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Switch a repo to a different branch or tag.")]
    async fn update_repo(&self, Parameters(params): Parameters<UpdateRepoParams>) -> String {
        let result: Result<Value> = async {
            let request = UpdateRepoRequest {
                branch: params.branch.clone(),
                tag: params.tag.clone(),
            };
            let repo = self.client.update_repo(&params.repo_id, &request).await?;
            Ok(json!({
                "repo": repo,
                "message": format!("Repo {} updated", params.repo_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Remove a repo from the workspace.")]
    async fn delete_repo(&self, Parameters(params): Parameters<RepoIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.delete_repo(&params.repo_id).await?;
            Ok(json!({
                "repo_id": params.repo_id,
                "message": format!("Repo {} deleted", params.repo_id),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permissions
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "Get the permission set of a repo.")]
    async fn get_repo_permissions(&self, Parameters(params): Parameters<RepoIdParams>) -> String {
        let result: Result<Value> = async {
            let permissions = self
                .client
                .get_object_permissions("repos", &params.repo_id)
                .await?;
            Ok(json!({ "permissions": permissions }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Replace a repo's access control list.")]
    async fn set_repo_permissions(
        &self,
        Parameters(params): Parameters<RepoPermissionsParams>,
    ) -> String {
        let result: Result<Value> = async {
            let request = AccessControlRequest {
                access_control_list: params.access_control_list.clone(),
            };
            let permissions = self
                .client
                .set_object_permissions("repos", &params.repo_id, &request)
                .await?;
            Ok(json!({
                "permissions": permissions,
                "message": format!("Permissions set on repo {}", params.repo_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Merge additional entries into a repo's access control list.")]
    async fn update_repo_permissions(
        &self,
        Parameters(params): Parameters<RepoPermissionsParams>,
    ) -> String {
        let result: Result<Value> = async {
            let request = AccessControlRequest {
                access_control_list: params.access_control_list.clone(),
            };
            let permissions = self
                .client
                .update_object_permissions("repos", &params.repo_id, &request)
                .await?;
            Ok(json!({
                "permissions": permissions,
                "message": format!("Permissions updated on repo {}", params.repo_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get the permission set of any securable workspace object.")]
    async fn get_workspace_permissions(
        &self,
        Parameters(params): Parameters<ObjectPermissionsParams>,
    ) -> String {
        let result: Result<Value> = async {
            let permissions = self
                .client
                .get_object_permissions(&params.workspace_object_type, &params.workspace_object_id)
                .await?;
            Ok(json!({ "permissions": permissions }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Replace the access control list of any securable workspace object.")]
    async fn set_workspace_permissions(
        &self,
        Parameters(params): Parameters<SetObjectPermissionsParams>,
    ) -> String {
        let result: Result<Value> = async {
            let request = AccessControlRequest {
                access_control_list: params.access_control_list.clone(),
            };
            let permissions = self
                .client
                .set_object_permissions(
                    &params.workspace_object_type,
                    &params.workspace_object_id,
                    &request,
                )
                .await?;
            Ok(json!({
                "permissions": permissions,
                "message": format!(
                    "Permissions set on {} {}",
                    params.workspace_object_type, params.workspace_object_id
                ),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Merge entries into the access control list of any securable workspace object.")]
    async fn update_workspace_permissions(
        &self,
        Parameters(params): Parameters<SetObjectPermissionsParams>,
    ) -> String {
        let result: Result<Value> = async {
            let request = AccessControlRequest {
                access_control_list: params.access_control_list.clone(),
            };
            let permissions = self
                .client
                .update_object_permissions(
                    &params.workspace_object_type,
                    &params.workspace_object_id,
                    &request,
                )
                .await?;
            Ok(json!({
                "permissions": permissions,
                "message": format!(
                    "Permissions updated on {} {}",
                    params.workspace_object_type, params.workspace_object_id
                ),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Current User / Settings
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "Get the identity the server is authenticated as.")]
    async fn get_current_user(&self) -> String {
        let result: Result<Value> = async {
            let user = self.client.get_current_user().await?;
            Ok(json!({ "current_user": user }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get workspace-wide settings (token management, IP access list toggles).")]
    async fn get_workspace_settings(&self) -> String {
        // Each settings read is independent; a missing toggle reports null
        // rather than failing the whole call.
        let token_management = match self.client.get_workspace_conf("enableTokensConfig").await {
            Ok(conf) => json!(conf),
            Err(e) => {
                warn!("could not read token management settings: {e}");
                Value::Null
            }
        };
        let ip_access_list = match self.client.get_workspace_conf("enableIpAccessLists").await {
            Ok(conf) => json!(conf),
            Err(e) => {
                warn!("could not read IP access list settings: {e}");
                Value::Null
            }
        };

        respond(Ok(json!({
            "workspace_settings": {
                "token_management": token_management,
                "ip_access_list": ip_access_list,
            }
        })))
    }

    #[tool(description = "Update token management settings via workspace-conf entries.")]
    async fn update_token_management_settings(
        &self,
        Parameters(params): Parameters<ConfEntriesParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client.set_workspace_conf(&params.settings).await?;
            Ok(json!({
                "message": "Token management settings updated successfully",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Update IP access list settings via workspace-conf entries.")]
    async fn update_ip_access_list_settings(
        &self,
        Parameters(params): Parameters<ConfEntriesParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client.set_workspace_conf(&params.settings).await?;
            Ok(json!({
                "message": "IP access list settings updated successfully",
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
    fn import_content_round_trips_through_base64() {
        let content = "print('hello')";
        let encoded = BASE64.encode(content.as_bytes());
        let decoded = BASE64.decode(&encoded).unwrap();
        assert_eq!(String::from_utf8(decoded).unwrap(), content);
    }

    #[test]
    fn update_repo_params_allow_branch_or_tag() {
        let p: UpdateRepoParams = serde_json::from_value(json!({
            "repo_id": "42",
            "branch": "main"
        }))
        .unwrap();
        assert_eq!(p.branch.as_deref(), Some("main"));
        assert!(p.tag.is_none());
    }
}
