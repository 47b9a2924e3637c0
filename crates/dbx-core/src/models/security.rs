//! Secrets, SCIM identities, tokens, IP access lists and workspace conf.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response from `GET /api/2.0/secrets/scopes/list`
#[derive(Debug, Clone, Deserialize)]
pub struct SecretScopeList {
    pub scopes: Option<Vec<SecretScope>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretScope {
    pub name: Option<String>,
    pub backend_type: Option<String>,
}

/// Response from `GET /api/2.0/secrets/list`
#[derive(Debug, Clone, Deserialize)]
pub struct SecretList {
    pub secrets: Option<Vec<SecretMetadata>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretMetadata {
    pub key: Option<String>,
    pub last_updated_timestamp: Option<i64>,
}

/// Response from `GET /api/2.0/secrets/acls/list`
#[derive(Debug, Clone, Deserialize)]
pub struct AclList {
    pub items: Option<Vec<AclItem>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclItem {
    pub principal: Option<String>,
    pub permission: Option<String>,
}

/// SCIM list envelope, shared by Users / Groups / ServicePrincipals.
#[derive(Debug, Clone, Deserialize)]
pub struct ScimList<T> {
    #[serde(rename = "Resources")]
    pub resources: Option<Vec<T>>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Option<String>,
    #[serde(rename = "userName")]
    pub user_name: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub active: Option<bool>,
    pub emails: Option<Vec<Value>>,
    pub groups: Option<Vec<Value>>,
    pub roles: Option<Vec<Value>>,
    pub schemas: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub members: Option<Vec<Value>>,
    pub groups: Option<Vec<Value>>,
    pub roles: Option<Vec<Value>>,
    pub schemas: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePrincipal {
    pub id: Option<String>,
    #[serde(rename = "applicationId")]
    pub application_id: Option<String>,
    #[serde(rename = "displayName")]
    pub display_name: Option<String>,
    pub active: Option<bool>,
    pub groups: Option<Vec<Value>>,
    pub roles: Option<Vec<Value>>,
    pub schemas: Option<Vec<String>>,
}

/// Response from `GET /api/2.0/token/list`
#[derive(Debug, Clone, Deserialize)]
pub struct TokenList {
    pub token_infos: Option<Vec<TokenInfo>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenInfo {
    pub token_id: Option<String>,
    pub creation_time: Option<i64>,
    pub expiry_time: Option<i64>,
    pub comment: Option<String>,
}

/// Request body for `POST /api/2.0/token/create`
#[derive(Debug, Clone, Serialize)]
pub struct CreateTokenRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime_seconds: Option<i64>,
}

/// Response from `POST /api/2.0/token/create`
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTokenResponse {
    pub token_value: Option<String>,
    pub token_info: Option<TokenInfo>,
}

/// Response from `GET /api/2.0/ip-access-lists`
#[derive(Debug, Clone, Deserialize)]
pub struct IpAccessListList {
    pub ip_access_lists: Option<Vec<IpAccessList>>,
}

/// Wrapper for endpoints returning a single IP access list.
#[derive(Debug, Clone, Deserialize)]
pub struct IpAccessListResponse {
    pub ip_access_list: Option<IpAccessList>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpAccessList {
    pub list_id: Option<String>,
    pub label: Option<String>,
    pub list_type: Option<String>,
    pub enabled: Option<bool>,
    pub ip_addresses: Option<Vec<String>>,
    pub created_at: Option<i64>,
    pub created_by: Option<i64>,
    pub updated_at: Option<i64>,
    pub updated_by: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn scim_list_reads_capitalized_resources() {
        let list: ScimList<User> = serde_json::from_value(json!({
            "Resources": [
                {"id": "1", "userName": "a@example.com", "active": true}
            ],
            "totalResults": 1
        }))
        .unwrap();
        let users = list.resources.unwrap();
        assert_eq!(users[0].user_name.as_deref(), Some("a@example.com"));
        assert_eq!(list.total_results, Some(1));
    }

    #[test]
    fn create_token_request_omits_unset_fields() {
        let req = CreateTokenRequest {
            comment: None,
            lifetime_seconds: None,
        };
        let v = serde_json::to_value(&req).unwrap();
        assert!(v.as_object().unwrap().is_empty());
    }

    #[test]
    fn user_serializes_stable_keys() {
        let u: User = serde_json::from_value(json!({"id": "1"})).unwrap();
        let v = serde_json::to_value(&u).unwrap();
        let obj = v.as_object().unwrap();
        assert!(obj.contains_key("userName"));
        assert!(obj["userName"].is_null());
        assert!(obj.contains_key("active"));
    }
}
