use serde::{Deserialize, Serialize};

use brandhub_core::{Role, Source};

/// An account: a customer of the private-label service, or a staff admin.
///
/// The password hash lives in its own column and is never part of the
/// serialized record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique identifier (UUIDv4, no dashes).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Login email, stored lowercased. Unique.
    pub email: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Company the customer orders for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,

    #[serde(default)]
    pub role: Role,

    /// Brand portal the account registered through.
    #[serde(default)]
    pub source: Source,

    /// Inactive accounts cannot log in.
    #[serde(default = "default_true")]
    pub active: bool,

    /// RFC 3339 creation timestamp.
    pub created_at: String,

    /// RFC 3339 last update timestamp.
    pub updated_at: String,
}

fn default_true() -> bool {
    true
}

/// Input for customer self-registration.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub source: Source,
}

/// Editable profile fields. `active` is honoured only for admins.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
}

/// Filters for listing users.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserFilters {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub source: Option<Source>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_json_is_camel_case() {
        let u = User {
            id: "u1".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            phone: None,
            company: Some("Asha Pharma".into()),
            role: Role::Customer,
            source: Source::Fishman,
            active: true,
            created_at: "2025-01-01T00:00:00.000000Z".into(),
            updated_at: "2025-01-01T00:00:00.000000Z".into(),
        };
        let v = serde_json::to_value(&u).unwrap();
        assert_eq!(v["createdAt"], "2025-01-01T00:00:00.000000Z");
        assert_eq!(v["source"], "fishman");
        assert_eq!(v["role"], "customer");
        assert!(v.get("phone").is_none());
    }

    #[test]
    fn patch_rejects_unknown_fields() {
        let r: Result<UserPatch, _> = serde_json::from_value(serde_json::json!({"role": "admin"}));
        assert!(r.is_err());
    }
}
