//! Security tools: secrets, SCIM identities, tokens, IP access lists and
//! workspace configuration.

use rmcp::{
    handler::server::wrapper::Parameters,
    schemars::{self, JsonSchema},
    tool, tool_router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::server::McpServer;
use crate::tools::respond;
use dbx_core::models::security::CreateTokenRequest;
use dbx_core::Result;

/// Workspace-conf keys read by default when none are requested.
const DEFAULT_CONF_KEYS: &str = "enableIpAccessLists,enableTokensConfig";

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ScopeNameParams {
    /// Secret scope name
    pub scope_name: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateScopeParams {
    /// Secret scope name
    pub scope_name: String,
    /// Scope backend type (default: DATABRICKS)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct PutSecretParams {
    /// Secret scope name
    pub scope_name: String,
    /// Secret key
    pub key: String,
    /// Secret value (stored, never returned by the API)
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct SecretKeyParams {
    /// Secret scope name
    pub scope_name: String,
    /// Secret key
    pub key: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ScopePrincipalParams {
    /// Secret scope name
    pub scope_name: String,
    /// Principal (user, group or service principal name)
    pub principal: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct PutAclParams {
    /// Secret scope name
    pub scope_name: String,
    /// Principal (user, group or service principal name)
    pub principal: String,
    /// Permission level (READ, WRITE, MANAGE)
    pub permission: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UserIdParams {
    /// SCIM user ID
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UserConfigParams {
    /// SCIM user resource (userName, displayName, ...)
    pub user_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UpdateUserParams {
    /// SCIM user ID
    pub user_id: String,
    /// Full replacement SCIM user resource
    pub user_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct GroupIdParams {
    /// SCIM group ID
    pub group_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct GroupConfigParams {
    /// SCIM group resource (displayName, members, ...)
    pub group_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UpdateGroupParams {
    /// SCIM group ID
    pub group_id: String,
    /// Full replacement SCIM group resource
    pub group_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ServicePrincipalIdParams {
    /// SCIM service principal ID
    pub sp_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct ServicePrincipalConfigParams {
    /// SCIM service principal resource (displayName, ...)
    pub sp_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UpdateServicePrincipalParams {
    /// SCIM service principal ID
    pub sp_id: String,
    /// Full replacement SCIM service principal resource
    pub sp_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateTokenParams {
    /// Optional comment describing the token's purpose
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    /// Token lifetime in seconds (omit for no expiry)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime_seconds: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct TokenIdParams {
    /// Token ID
    pub token_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct IpAccessListIdParams {
    /// IP access list ID
    pub list_id: String,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct CreateIpAccessListParams {
    /// IP access list spec (label, list_type, ip_addresses)
    pub ip_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct UpdateIpAccessListParams {
    /// IP access list ID
    pub list_id: String,
    /// Fields to update (label, list_type, ip_addresses, enabled)
    pub ip_config: Value,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct GetWorkspaceConfParams {
    /// Comma-separated workspace-conf keys to read (defaults to the token and
    /// IP access list toggles)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub(crate) struct SetWorkspaceConfParams {
    /// Configuration key to set
    pub config_key: String,
    /// Configuration value to set
    pub config_value: String,
}

#[tool_router(router = security_router, vis = "pub(crate)")]
impl McpServer {
    // ─────────────────────────────────────────────────────────────────────────
    // Secrets
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all secret scopes in the workspace.")]
    async fn list_secret_scopes(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_secret_scopes().await?;
            let scopes = list.scopes.unwrap_or_default();
            let count = scopes.len();
            Ok(json!({
                "scopes": scopes,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a secret scope.")]
    async fn create_secret_scope(
        &self,
        Parameters(params): Parameters<CreateScopeParams>,
    ) -> String {
        let result: Result<Value> = async {
            let backend = params
                .backend_type
                .clone()
                .unwrap_or_else(|| "DATABRICKS".to_string());
            self.client
                .create_secret_scope(&params.scope_name, &backend)
                .await?;
            Ok(json!({
                "scope_name": params.scope_name,
                "backend_type": backend,
                "message": format!("Secret scope \"{}\" created", params.scope_name),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a secret scope and all secrets in it.")]
    async fn delete_secret_scope(&self, Parameters(params): Parameters<ScopeNameParams>) -> String {
        let result: Result<Value> = async {
            self.client.delete_secret_scope(&params.scope_name).await?;
            Ok(json!({
                "scope_name": params.scope_name,
                "message": format!("Secret scope \"{}\" deleted", params.scope_name),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "List secret keys in a scope. Values are never returned.")]
    async fn list_secrets(&self, Parameters(params): Parameters<ScopeNameParams>) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_secrets(&params.scope_name).await?;
            let secrets = list.secrets.unwrap_or_default();
            let count = secrets.len();
            Ok(json!({
                "scope_name": params.scope_name,
                "secrets": secrets,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Store a secret value under a key in a scope.")]
    async fn put_secret(&self, Parameters(params): Parameters<PutSecretParams>) -> String {
        let result: Result<Value> = async {
            self.client
                .put_secret(&params.scope_name, &params.key, &params.value)
                .await?;
            Ok(json!({
                "scope_name": params.scope_name,
                "key": params.key,
                "message": format!(
                    "Secret \"{}\" stored in scope \"{}\"",
                    params.key, params.scope_name
                ),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a secret from a scope.")]
    async fn delete_secret(&self, Parameters(params): Parameters<SecretKeyParams>) -> String {
        let result: Result<Value> = async {
            self.client
                .delete_secret(&params.scope_name, &params.key)
                .await?;
            Ok(json!({
                "scope_name": params.scope_name,
                "key": params.key,
                "message": format!(
                    "Secret \"{}\" deleted from scope \"{}\"",
                    params.key, params.scope_name
                ),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get the ACL for a principal on a secret scope.")]
    async fn get_secret_acl(&self, Parameters(params): Parameters<ScopePrincipalParams>) -> String {
        let result: Result<Value> = async {
            let acl = self
                .client
                .get_secret_acl(&params.scope_name, &params.principal)
                .await?;
            Ok(json!({
                "scope_name": params.scope_name,
                "acl": acl,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "List all ACLs on a secret scope.")]
    async fn list_secret_acls(&self, Parameters(params): Parameters<ScopeNameParams>) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_secret_acls(&params.scope_name).await?;
            let acls = list.items.unwrap_or_default();
            let count = acls.len();
            Ok(json!({
                "scope_name": params.scope_name,
                "acls": acls,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Grant a principal a permission (READ, WRITE, MANAGE) on a secret scope.")]
    async fn put_secret_acl(&self, Parameters(params): Parameters<PutAclParams>) -> String {
        let result: Result<Value> = async {
            self.client
                .put_secret_acl(&params.scope_name, &params.principal, &params.permission)
                .await?;
            Ok(json!({
                "scope_name": params.scope_name,
                "principal": params.principal,
                "permission": params.permission,
                "message": format!(
                    "ACL set for \"{}\" on scope \"{}\"",
                    params.principal, params.scope_name
                ),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Remove a principal's ACL from a secret scope.")]
    async fn delete_secret_acl(
        &self,
        Parameters(params): Parameters<ScopePrincipalParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client
                .delete_secret_acl(&params.scope_name, &params.principal)
                .await?;
            Ok(json!({
                "scope_name": params.scope_name,
                "principal": params.principal,
                "message": format!(
                    "ACL removed for \"{}\" on scope \"{}\"",
                    params.principal, params.scope_name
                ),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Users
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all workspace users.")]
    async fn list_users(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_users().await?;
            let users = list.resources.unwrap_or_default();
            let count = users.len();
            Ok(json!({
                "users": users,
                "count": count,
                "total_results": list.total_results,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a workspace user by SCIM ID.")]
    async fn get_user(&self, Parameters(params): Parameters<UserIdParams>) -> String {
        let result: Result<Value> = async {
            let user = self.client.get_user(&params.user_id).await?;
            Ok(json!({ "user": user }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a workspace user from a SCIM resource.")]
    async fn create_user(&self, Parameters(params): Parameters<UserConfigParams>) -> String {
        let result: Result<Value> = async {
            let user = self.client.create_user(&params.user_config).await?;
            Ok(json!({
                "user": user,
                "message": "User created",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Replace a workspace user's SCIM resource.")]
    async fn update_user(&self, Parameters(params): Parameters<UpdateUserParams>) -> String {
        let result: Result<Value> = async {
            let user = self
                .client
                .update_user(&params.user_id, &params.user_config)
                .await?;
            Ok(json!({
                "user": user,
                "message": format!("User {} updated", params.user_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a workspace user.")]
    async fn delete_user(&self, Parameters(params): Parameters<UserIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.delete_user(&params.user_id).await?;
            Ok(json!({
                "user_id": params.user_id,
                "message": format!("User {} deleted", params.user_id),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Groups
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all workspace groups.")]
    async fn list_groups(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_groups().await?;
            let groups = list.resources.unwrap_or_default();
            let count = groups.len();
            Ok(json!({
                "groups": groups,
                "count": count,
                "total_results": list.total_results,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a workspace group by SCIM ID.")]
    async fn get_group(&self, Parameters(params): Parameters<GroupIdParams>) -> String {
        let result: Result<Value> = async {
            let group = self.client.get_group(&params.group_id).await?;
            Ok(json!({ "group": group }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a workspace group from a SCIM resource.")]
    async fn create_group(&self, Parameters(params): Parameters<GroupConfigParams>) -> String {
        let result: Result<Value> = async {
            let group = self.client.create_group(&params.group_config).await?;
            Ok(json!({
                "group": group,
                "message": "Group created",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Replace a workspace group's SCIM resource.")]
    async fn update_group(&self, Parameters(params): Parameters<UpdateGroupParams>) -> String {
        let result: Result<Value> = async {
            let group = self
                .client
                .update_group(&params.group_id, &params.group_config)
                .await?;
            Ok(json!({
                "group": group,
                "message": format!("Group {} updated", params.group_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a workspace group.")]
    async fn delete_group(&self, Parameters(params): Parameters<GroupIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.delete_group(&params.group_id).await?;
            Ok(json!({
                "group_id": params.group_id,
                "message": format!("Group {} deleted", params.group_id),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Service Principals
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all service principals in the workspace.")]
    async fn list_service_principals(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_service_principals().await?;
            let service_principals = list.resources.unwrap_or_default();
            let count = service_principals.len();
            Ok(json!({
                "service_principals": service_principals,
                "count": count,
                "total_results": list.total_results,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get a service principal by SCIM ID.")]
    async fn get_service_principal(
        &self,
        Parameters(params): Parameters<ServicePrincipalIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            let sp = self.client.get_service_principal(&params.sp_id).await?;
            Ok(json!({ "service_principal": sp }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a service principal from a SCIM resource.")]
    async fn create_service_principal(
        &self,
        Parameters(params): Parameters<ServicePrincipalConfigParams>,
    ) -> String {
        let result: Result<Value> = async {
            let sp = self.client.create_service_principal(&params.sp_config).await?;
            Ok(json!({
                "service_principal": sp,
                "message": "Service principal created",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Replace a service principal's SCIM resource.")]
    async fn update_service_principal(
        &self,
        Parameters(params): Parameters<UpdateServicePrincipalParams>,
    ) -> String {
        let result: Result<Value> = async {
            let sp = self
                .client
                .update_service_principal(&params.sp_id, &params.sp_config)
                .await?;
            Ok(json!({
                "service_principal": sp,
                "message": format!("Service principal {} updated", params.sp_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete a service principal.")]
    async fn delete_service_principal(
        &self,
        Parameters(params): Parameters<ServicePrincipalIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client.delete_service_principal(&params.sp_id).await?;
            Ok(json!({
                "sp_id": params.sp_id,
                "message": format!("Service principal {} deleted", params.sp_id),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tokens
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List personal access tokens in the workspace.")]
    async fn list_tokens(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_tokens().await?;
            let tokens = list.token_infos.unwrap_or_default();
            let count = tokens.len();
            Ok(json!({
                "tokens": tokens,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create a personal access token. The token value is only returned once.")]
    async fn create_token(&self, Parameters(params): Parameters<CreateTokenParams>) -> String {
        let result: Result<Value> = async {
            let request = CreateTokenRequest {
                comment: params.comment.clone(),
                lifetime_seconds: params.lifetime_seconds,
            };
            let response = self.client.create_token(&request).await?;
            Ok(json!({
                "token_value": response.token_value,
                "token_info": response.token_info,
                "message": "Token created. Store the value now; it cannot be retrieved again.",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Revoke a personal access token by ID.")]
    async fn revoke_token(&self, Parameters(params): Parameters<TokenIdParams>) -> String {
        let result: Result<Value> = async {
            self.client.revoke_token(&params.token_id).await?;
            Ok(json!({
                "token_id": params.token_id,
                "message": format!("Token {} revoked", params.token_id),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // IP Access Lists
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "List all IP access lists configured for the workspace.")]
    async fn list_ip_access_lists(&self) -> String {
        let result: Result<Value> = async {
            let list = self.client.list_ip_access_lists().await?;
            let ip_access_lists = list.ip_access_lists.unwrap_or_default();
            let count = ip_access_lists.len();
            Ok(json!({
                "ip_access_lists": ip_access_lists,
                "count": count,
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Get an IP access list by ID.")]
    async fn get_ip_access_list(
        &self,
        Parameters(params): Parameters<IpAccessListIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            let response = self.client.get_ip_access_list(&params.list_id).await?;
            Ok(json!({ "ip_access_list": response.ip_access_list }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Create an IP access list (ALLOW or BLOCK) from a spec.")]
    async fn create_ip_access_list(
        &self,
        Parameters(params): Parameters<CreateIpAccessListParams>,
    ) -> String {
        let result: Result<Value> = async {
            let response = self.client.create_ip_access_list(&params.ip_config).await?;
            Ok(json!({
                "ip_access_list": response.ip_access_list,
                "message": "IP access list created",
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Update fields of an IP access list.")]
    async fn update_ip_access_list(
        &self,
        Parameters(params): Parameters<UpdateIpAccessListParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client
                .update_ip_access_list(&params.list_id, &params.ip_config)
                .await?;
            Ok(json!({
                "list_id": params.list_id,
                "message": format!("IP access list {} updated", params.list_id),
            }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Delete an IP access list.")]
    async fn delete_ip_access_list(
        &self,
        Parameters(params): Parameters<IpAccessListIdParams>,
    ) -> String {
        let result: Result<Value> = async {
            self.client.delete_ip_access_list(&params.list_id).await?;
            Ok(json!({
                "list_id": params.list_id,
                "message": format!("IP access list {} deleted", params.list_id),
            }))
        }
        .await;
        respond(result)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Workspace Conf
    // ─────────────────────────────────────────────────────────────────────────

    #[tool(description = "Get workspace configuration settings for a comma-separated key list.")]
    async fn get_workspace_conf(
        &self,
        Parameters(params): Parameters<GetWorkspaceConfParams>,
    ) -> String {
        let keys = params
            .keys
            .unwrap_or_else(|| DEFAULT_CONF_KEYS.to_string());
        let result: Result<Value> = async {
            let conf = self.client.get_workspace_conf(&keys).await?;
            Ok(json!({ "workspace_configuration": conf }))
        }
        .await;
        respond(result)
    }

    #[tool(description = "Set a single workspace configuration key.")]
    async fn set_workspace_conf(
        &self,
        Parameters(params): Parameters<SetWorkspaceConfParams>,
    ) -> String {
        let result: Result<Value> = async {
            let mut entries = HashMap::new();
            entries.insert(params.config_key.clone(), params.config_value.clone());
            self.client.set_workspace_conf(&entries).await?;
            Ok(json!({
                "config_key": params.config_key,
                "config_value": params.config_value,
                "message": format!(
                    "Workspace configuration {} set successfully",
                    params.config_key
                ),
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
    fn default_conf_keys_cover_settings_toggles() {
        assert!(DEFAULT_CONF_KEYS.contains("enableIpAccessLists"));
        assert!(DEFAULT_CONF_KEYS.contains("enableTokensConfig"));
    }

    #[test]
    fn create_scope_params_default_backend_is_applied_later() {
        let p: CreateScopeParams = serde_json::from_value(json!({
            "scope_name": "ml-secrets"
        }))
        .unwrap();
        assert!(p.backend_type.is_none());
    }
}
