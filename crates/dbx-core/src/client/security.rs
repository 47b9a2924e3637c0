//! Secrets, SCIM identities, tokens, IP access lists and workspace conf.

use super::WorkspaceClient;
use crate::error::Result;
use crate::models::security::*;
use serde_json::{json, Value};
use std::collections::HashMap;

impl WorkspaceClient {
    // ─────────────────────────────────────────────────────────────────────────
    // Secrets
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_secret_scopes(&self) -> Result<SecretScopeList> {
        self.get("/api/2.0/secrets/scopes/list").await
    }

    pub async fn create_secret_scope(&self, scope: &str, backend_type: &str) -> Result<Value> {
        self.post(
            "/api/2.0/secrets/scopes/create",
            &json!({ "scope": scope, "scope_backend_type": backend_type }),
        )
        .await
    }

    pub async fn delete_secret_scope(&self, scope: &str) -> Result<Value> {
        self.post("/api/2.0/secrets/scopes/delete", &json!({ "scope": scope }))
            .await
    }

    pub async fn list_secrets(&self, scope: &str) -> Result<SecretList> {
        self.get_query("/api/2.0/secrets/list", &[("scope", scope.into())])
            .await
    }

    pub async fn put_secret(&self, scope: &str, key: &str, value: &str) -> Result<Value> {
        self.post(
            "/api/2.0/secrets/put",
            &json!({ "scope": scope, "key": key, "string_value": value }),
        )
        .await
    }

    pub async fn delete_secret(&self, scope: &str, key: &str) -> Result<Value> {
        self.post(
            "/api/2.0/secrets/delete",
            &json!({ "scope": scope, "key": key }),
        )
        .await
    }

    pub async fn get_secret_acl(&self, scope: &str, principal: &str) -> Result<AclItem> {
        self.get_query(
            "/api/2.0/secrets/acls/get",
            &[("scope", scope.into()), ("principal", principal.into())],
        )
        .await
    }

    pub async fn list_secret_acls(&self, scope: &str) -> Result<AclList> {
        self.get_query("/api/2.0/secrets/acls/list", &[("scope", scope.into())])
            .await
    }

    pub async fn put_secret_acl(&self, scope: &str, principal: &str, permission: &str) -> Result<Value> {
        self.post(
            "/api/2.0/secrets/acls/put",
            &json!({ "scope": scope, "principal": principal, "permission": permission }),
        )
        .await
    }

    pub async fn delete_secret_acl(&self, scope: &str, principal: &str) -> Result<Value> {
        self.post(
            "/api/2.0/secrets/acls/delete",
            &json!({ "scope": scope, "principal": principal }),
        )
        .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // SCIM: Users / Groups / Service Principals
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_users(&self) -> Result<ScimList<User>> {
        self.get("/api/2.0/preview/scim/v2/Users").await
    }

    pub async fn get_user(&self, user_id: &str) -> Result<User> {
        self.get(&format!("/api/2.0/preview/scim/v2/Users/{user_id}"))
            .await
    }

    pub async fn create_user(&self, user_config: &Value) -> Result<User> {
        self.post("/api/2.0/preview/scim/v2/Users", user_config)
            .await
    }

    /// SCIM replace: the supplied config becomes the new resource state.
    pub async fn update_user(&self, user_id: &str, user_config: &Value) -> Result<User> {
        self.put(
            &format!("/api/2.0/preview/scim/v2/Users/{user_id}"),
            user_config,
        )
        .await
    }

    pub async fn delete_user(&self, user_id: &str) -> Result<Value> {
        self.delete(&format!("/api/2.0/preview/scim/v2/Users/{user_id}"))
            .await
    }

    pub async fn list_groups(&self) -> Result<ScimList<Group>> {
        self.get("/api/2.0/preview/scim/v2/Groups").await
    }

    pub async fn get_group(&self, group_id: &str) -> Result<Group> {
        self.get(&format!("/api/2.0/preview/scim/v2/Groups/{group_id}"))
            .await
    }

    pub async fn create_group(&self, group_config: &Value) -> Result<Group> {
        self.post("/api/2.0/preview/scim/v2/Groups", group_config)
            .await
    }

    pub async fn update_group(&self, group_id: &str, group_config: &Value) -> Result<Group> {
        self.put(
            &format!("/api/2.0/preview/scim/v2/Groups/{group_id}"),
            group_config,
        )
        .await
    }

    pub async fn delete_group(&self, group_id: &str) -> Result<Value> {
        self.delete(&format!("/api/2.0/preview/scim/v2/Groups/{group_id}"))
            .await
    }

    pub async fn list_service_principals(&self) -> Result<ScimList<ServicePrincipal>> {
        self.get("/api/2.0/preview/scim/v2/ServicePrincipals").await
    }

    pub async fn get_service_principal(&self, sp_id: &str) -> Result<ServicePrincipal> {
        self.get(&format!("/api/2.0/preview/scim/v2/ServicePrincipals/{sp_id}"))
            .await
    }

    pub async fn create_service_principal(&self, sp_config: &Value) -> Result<ServicePrincipal> {
        self.post("/api/2.0/preview/scim/v2/ServicePrincipals", sp_config)
            .await
    }

    pub async fn update_service_principal(
        &self,
        sp_id: &str,
        sp_config: &Value,
    ) -> Result<ServicePrincipal> {
        self.put(
            &format!("/api/2.0/preview/scim/v2/ServicePrincipals/{sp_id}"),
            sp_config,
        )
        .await
    }

    pub async fn delete_service_principal(&self, sp_id: &str) -> Result<Value> {
        self.delete(&format!("/api/2.0/preview/scim/v2/ServicePrincipals/{sp_id}"))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Tokens
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_tokens(&self) -> Result<TokenList> {
        self.get("/api/2.0/token/list").await
    }

    pub async fn create_token(&self, req: &CreateTokenRequest) -> Result<CreateTokenResponse> {
        self.post("/api/2.0/token/create", req).await
    }

    pub async fn revoke_token(&self, token_id: &str) -> Result<Value> {
        self.post("/api/2.0/token/delete", &json!({ "token_id": token_id }))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // IP Access Lists
    // ─────────────────────────────────────────────────────────────────────────

    pub async fn list_ip_access_lists(&self) -> Result<IpAccessListList> {
        self.get("/api/2.0/ip-access-lists").await
    }

    pub async fn get_ip_access_list(&self, list_id: &str) -> Result<IpAccessListResponse> {
        self.get(&format!("/api/2.0/ip-access-lists/{list_id}"))
            .await
    }

    pub async fn create_ip_access_list(&self, ip_config: &Value) -> Result<IpAccessListResponse> {
        self.post("/api/2.0/ip-access-lists", ip_config).await
    }

    pub async fn update_ip_access_list(&self, list_id: &str, ip_config: &Value) -> Result<Value> {
        self.patch(&format!("/api/2.0/ip-access-lists/{list_id}"), ip_config)
            .await
    }

    pub async fn delete_ip_access_list(&self, list_id: &str) -> Result<Value> {
        self.delete(&format!("/api/2.0/ip-access-lists/{list_id}"))
            .await
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Workspace Conf
    // ─────────────────────────────────────────────────────────────────────────

    /// Read workspace-conf entries for a comma-separated key list. The API
    /// returns a flat string map.
    pub async fn get_workspace_conf(&self, keys: &str) -> Result<HashMap<String, Option<String>>> {
        self.get_query("/api/2.0/workspace-conf", &[("keys", keys.into())])
            .await
    }

    pub async fn set_workspace_conf(&self, entries: &HashMap<String, String>) -> Result<Value> {
        self.patch("/api/2.0/workspace-conf", entries).await
    }
}
