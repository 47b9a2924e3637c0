//! Workspace object tree, repos and object permissions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response from `GET /api/2.0/workspace/list`
#[derive(Debug, Clone, Deserialize)]
pub struct WorkspaceObjectList {
    pub objects: Option<Vec<ObjectInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub object_type: Option<String>,
    pub path: Option<String>,
    pub language: Option<String>,
    pub object_id: Option<i64>,
    pub size: Option<i64>,
    pub created_at: Option<i64>,
    pub modified_at: Option<i64>,
}

/// Response from `GET /api/2.0/workspace/export` (content is base64).
#[derive(Debug, Clone, Deserialize)]
pub struct ExportResponse {
    pub content: Option<String>,
    pub file_type: Option<String>,
}

/// Request body for `POST /api/2.0/workspace/import`
#[derive(Debug, Clone, Serialize)]
pub struct ImportRequest {
    pub path: String,
    /// Base64-encoded content.
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    pub format: String,
    pub overwrite: bool,
}

/// Response from `GET /api/2.0/repos`
#[derive(Debug, Clone, Deserialize)]
pub struct RepoList {
    pub repos: Option<Vec<RepoInfo>>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoInfo {
    pub id: Option<i64>,
    pub path: Option<String>,
    pub url: Option<String>,
    pub provider: Option<String>,
    pub branch: Option<String>,
    pub head_commit_id: Option<String>,
}

/// Request body for `PATCH /api/2.0/repos/{id}`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateRepoRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

/// Response from `GET /api/2.0/permissions/{type}/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectPermissions {
    pub object_id: Option<String>,
    pub object_type: Option<String>,
    pub access_control_list: Option<Vec<AccessControlEntry>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessControlEntry {
    pub user_name: Option<String>,
    pub group_name: Option<String>,
    pub service_principal_name: Option<String>,
    pub all_permissions: Option<Vec<Value>>,
}

/// Request body for permission set/update calls.
#[derive(Debug, Clone, Serialize)]
pub struct AccessControlRequest {
    pub access_control_list: Vec<Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_repo_request_with_branch_only() {
        let req = UpdateRepoRequest {
            branch: Some("main".into()),
            tag: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        let obj = v.as_object().unwrap();
        assert_eq!(obj["branch"], "main");
        assert!(!obj.contains_key("tag"));
    }

    #[test]
    fn permissions_entry_keeps_null_principals() {
        let e: AccessControlEntry = serde_json::from_value(json!({
            "group_name": "admins",
            "all_permissions": [{"permission_level": "CAN_MANAGE"}]
        }))
        .unwrap();
        let v = serde_json::to_value(&e).unwrap();
        let obj = v.as_object().unwrap();
        assert!(obj["user_name"].is_null());
        assert_eq!(obj["group_name"], "admins");
    }
}
