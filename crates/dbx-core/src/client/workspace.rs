//! Workspace object tree, repos, permissions and the current user.

use super::WorkspaceClient;
use crate::error::Result;
use crate::models::security::User;
use crate::models::workspace::*;
use serde_json::{json, Value};

impl WorkspaceClient {
    // ─────────────────────────────────────────────────────────────────────────
    // Workspace Objects
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_workspace_objects(&self, path: &str) -> Result<WorkspaceObjectList> {
        self.get_query("/api/2.0/workspace/list", &[("path", path.into())])
            .await
    }

    pub async fn get_workspace_object_status(&self, path: &str) -> Result<ObjectInfo> {
        self.get_query("/api/2.0/workspace/get-status", &[("path", path.into())])
            .await
    }

    pub async fn export_workspace_object(&self, path: &str, format: &str) -> Result<ExportResponse> {
        self.get_query(
            "/api/2.0/workspace/export",
            &[("path", path.into()), ("format", format.into())],
        )
        .await
    }

    pub async fn import_workspace_object(&self, req: &ImportRequest) -> Result<Value> {
        self.post("/api/2.0/workspace/import", req).await
    }

    pub async fn delete_workspace_object(&self, path: &str, recursive: bool) -> Result<Value> {
        self.post(
            "/api/2.0/workspace/delete",
            &json!({ "path": path, "recursive": recursive }),
        )
        .await
    }

    pub async fn create_workspace_directory(&self, path: &str) -> Result<Value> {
        self.post("/api/2.0/workspace/mkdirs", &json!({ "path": path }))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Repos
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_repos(&self) -> Result<RepoList> {
        self.get("/api/2.0/repos").await
    }

    pub async fn get_repo(&self, repo_id: &str) -> Result<RepoInfo> {
        self.get(&format!("/api/2.0/repos/{repo_id}")).await
    }

    pub async fn create_repo(&self, repo_config: &Value) -> Result<RepoInfo> {
        self.post("/api/2.0/repos", repo_config).await
    }

    pub async fn update_repo(&self, repo_id: &str, req: &UpdateRepoRequest) -> Result<RepoInfo> {
        self.patch(&format!("/api/2.0/repos/{repo_id}"), req).await
    }

    pub async fn delete_repo(&self, repo_id: &str) -> Result<Value> {
        self.delete(&format!("/api/2.0/repos/{repo_id}")).await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permissions
    // ─────────────────────────────────────────────────────────────────────────

    /// Fetch the permission set of any securable workspace object
    /// (`repos`, `notebooks`, `directories`, `clusters`, ...).
    pub async fn get_object_permissions(
        &self,
        object_type: &str,
        object_id: &str,
    ) -> Result<ObjectPermissions> {
        self.get(&format!("/api/2.0/permissions/{object_type}/{object_id}"))
            .await
    }

    /// Replace an object's access control list.
    pub async fn set_object_permissions(
        &self,
        object_type: &str,
        object_id: &str,
        req: &AccessControlRequest,
    ) -> Result<ObjectPermissions> {
        self.put(&format!("/api/2.0/permissions/{object_type}/{object_id}"), req)
            .await
    }

    /// Merge additional entries into an object's access control list.
    pub async fn update_object_permissions(
        &self,
        object_type: &str,
        object_id: &str,
        req: &AccessControlRequest,
    ) -> Result<ObjectPermissions> {
        self.patch(&format!("/api/2.0/permissions/{object_type}/{object_id}"), req)
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Current User
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn get_current_user(&self) -> Result<User> {
        self.get("/api/2.0/preview/scim/v2/Me").await
    }
}
