//! Caller identity shared by every module.
//!
//! The auth module issues JWTs carrying these claims; the server binary
//! verifies them and inserts `Claims` into request extensions, where
//! handlers pick them up with `Extension<Claims>`.

use serde::{Deserialize, Serialize};

use crate::{ServiceError, Source};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Customer => "customer",
        }
    }
}

/// Which half of a token pair a JWT is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    #[default]
    Access,
    Refresh,
}

/// JWT claims payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: user id.
    pub sub: String,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    pub role: Role,
    /// Brand context the account registered through.
    #[serde(default)]
    pub source: Source,
    /// Session id (for refresh/revoke).
    pub sid: String,
    #[serde(default)]
    pub kind: TokenKind,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fail with `PermissionDenied` unless the caller is an admin.
    pub fn require_admin(&self) -> Result<(), ServiceError> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(ServiceError::PermissionDenied(format!(
                "user {} is not an admin",
                self.sub
            )))
        }
    }

    /// Admins see everything; customers only what they own.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.is_admin() || self.sub == owner_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: "u1".into(),
            name: "Asha".into(),
            email: "asha@example.com".into(),
            role,
            source: Source::Veerix,
            sid: "s1".into(),
            kind: TokenKind::Access,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn customer_access_is_owner_only() {
        let c = claims(Role::Customer);
        assert!(c.can_access("u1"));
        assert!(!c.can_access("u2"));
        assert!(c.require_admin().is_err());
    }

    #[test]
    fn admin_accesses_everything() {
        let a = claims(Role::Admin);
        assert!(a.can_access("u2"));
        assert!(a.require_admin().is_ok());
    }
}
