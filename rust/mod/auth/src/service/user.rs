use brandhub_core::{Claims, ListParams, ListResult, Role, Source, new_id, now_rfc3339};
use brandhub_sql::Value;
use tracing::info;

use crate::model::{RegisterInput, User, UserFilters, UserPatch};
use crate::service::password::{hash_password, is_valid_hash};
use crate::service::{AuthError, AuthService, decode_row};

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_lowercase();
    let valid = match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(AuthError::Validation(format!("invalid email address: {:?}", email)));
    }
    Ok(email)
}

fn non_empty(field: &str, value: &str) -> Result<String, AuthError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(AuthError::Validation(format!("{} must not be empty", field)));
    }
    Ok(v.to_string())
}

/// Blank optional strings are stored as absent.
fn optional(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

impl AuthService {
    /// Self-registration of a customer account.
    pub fn register(&self, input: RegisterInput) -> Result<User, AuthError> {
        if input.password.chars().count() < self.config.min_password_len {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                self.config.min_password_len
            )));
        }
        let hash = hash_password(&input.password)?;
        let user = self.insert_user(
            &input.name,
            &input.email,
            optional(input.phone),
            optional(input.company),
            Role::Customer,
            input.source,
            &hash,
        )?;
        info!(user = %user.id, source = %user.source, "customer registered");
        Ok(user)
    }

    /// Make sure the configured admin account exists with the given
    /// password hash. Creates it on first start, refreshes the hash after.
    pub fn ensure_admin(&self, email: &str, name: &str, password_hash: &str) -> Result<User, AuthError> {
        if !is_valid_hash(password_hash) {
            return Err(AuthError::Validation("admin password hash is not a valid PHC string".into()));
        }
        let email = normalize_email(email)?;
        match self.find_by_email(&email)? {
            Some((mut user, _, _)) => {
                user.role = Role::Admin;
                user.active = true;
                user.updated_at = now_rfc3339();
                self.update_record("users", &user.id.clone(), &user, &[
                    ("role", Value::Text(Role::Admin.as_str().into())),
                    ("active", Value::Integer(1)),
                    ("password_hash", Value::Text(password_hash.to_string())),
                    ("updated_at", Value::Text(user.updated_at.clone())),
                ])?;
                info!(user = %user.id, "admin account verified");
                Ok(user)
            }
            None => {
                let user = self.insert_user(name, &email, None, None, Role::Admin, Source::default(), password_hash)?;
                info!(user = %user.id, "admin account created");
                Ok(user)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn insert_user(
        &self,
        name: &str,
        email: &str,
        phone: Option<String>,
        company: Option<String>,
        role: Role,
        source: Source,
        password_hash: &str,
    ) -> Result<User, AuthError> {
        let name = non_empty("name", name)?;
        let email = normalize_email(email)?;
        if self.find_by_email(&email)?.is_some() {
            return Err(AuthError::Conflict(format!("email {} is already registered", email)));
        }

        let now = now_rfc3339();
        let user = User {
            id: new_id(),
            name,
            email: email.clone(),
            phone,
            company,
            role,
            source,
            active: true,
            created_at: now.clone(),
            updated_at: now.clone(),
        };

        self.insert_record("users", &user.id, &user, &[
            ("email", Value::Text(email)),
            ("role", Value::Text(role.as_str().into())),
            ("source", Value::Text(source.as_str().into())),
            ("active", Value::Integer(1)),
            ("password_hash", Value::Text(password_hash.to_string())),
            ("created_at", Value::Text(now.clone())),
            ("updated_at", Value::Text(now)),
        ])?;
        Ok(user)
    }

    pub fn get_user(&self, id: &str) -> Result<User, AuthError> {
        self.get_record("users", id)
    }

    /// Look up a user by (normalized) email, returning the record, its
    /// password hash and the `active` flag.
    pub(crate) fn find_by_email(&self, email: &str) -> Result<Option<(User, String, bool)>, AuthError> {
        let rows = self.sql.query(
            "SELECT data, password_hash, active FROM users WHERE email = ?1",
            &[Value::Text(email.trim().to_lowercase())],
        )?;
        let Some(row) = rows.first() else {
            return Ok(None);
        };
        let user: User = decode_row(row)?;
        let hash = row.get_str("password_hash").unwrap_or_default().to_string();
        let active = row.get_i64("active").unwrap_or(0) != 0;
        Ok(Some((user, hash, active)))
    }

    pub fn list_users(&self, params: &ListParams, filters: &UserFilters) -> Result<ListResult<User>, AuthError> {
        let mut clauses = Vec::new();
        let mut args = Vec::new();
        if let Some(role) = filters.role {
            args.push(Value::Text(role.as_str().into()));
            clauses.push(format!("role = ?{}", args.len()));
        }
        if let Some(source) = filters.source {
            args.push(Value::Text(source.as_str().into()));
            clauses.push(format!("source = ?{}", args.len()));
        }
        if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            args.push(Value::Text(format!("%{}%", q.to_lowercase())));
            clauses.push(format!("(email LIKE ?{n} OR lower(data) LIKE ?{n})", n = args.len()));
        }
        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let count_rows = self.sql.query(&format!("SELECT COUNT(*) AS cnt FROM users{}", where_sql), &args)?;
        let total = count_rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

        let mut page_args = args.clone();
        page_args.push(Value::Integer(params.clamped_limit() as i64));
        page_args.push(Value::Integer(params.offset as i64));
        let sql = format!(
            "SELECT data FROM users{} ORDER BY created_at DESC LIMIT ?{} OFFSET ?{}",
            where_sql,
            page_args.len() - 1,
            page_args.len(),
        );
        let items = self
            .sql
            .query(&sql, &page_args)?
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<User>, _>>()?;

        Ok(ListResult { items, total })
    }

    /// Update a profile. Customers may edit only themselves and never the
    /// `active` flag; admins may edit anyone.
    pub fn update_user(&self, caller: &Claims, id: &str, patch: UserPatch) -> Result<User, AuthError> {
        if !caller.can_access(id) {
            return Err(AuthError::Forbidden(format!("cannot edit user {}", id)));
        }
        if patch.active.is_some() && !caller.is_admin() {
            return Err(AuthError::Forbidden("only admins can change account status".into()));
        }
        if patch.active == Some(false) && caller.sub == id {
            return Err(AuthError::Validation("admins cannot deactivate themselves".into()));
        }

        let mut user = self.get_user(id)?;
        if let Some(name) = patch.name {
            user.name = non_empty("name", &name)?;
        }
        if patch.phone.is_some() {
            user.phone = optional(patch.phone);
        }
        if patch.company.is_some() {
            user.company = optional(patch.company);
        }
        if let Some(active) = patch.active {
            user.active = active;
        }
        user.updated_at = now_rfc3339();

        self.update_record("users", id, &user, &[
            ("active", Value::Integer(user.active as i64)),
            ("updated_at", Value::Text(user.updated_at.clone())),
        ])?;

        if !user.active {
            let revoked = self.revoke_all_user_sessions(id)?;
            info!(user = %id, revoked, "account deactivated");
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::service;

    fn register(svc: &AuthService, email: &str) -> User {
        svc.register(RegisterInput {
            name: "Asha".into(),
            email: email.into(),
            password: "longenough".into(),
            phone: Some("  ".into()),
            company: Some("Asha Pharma".into()),
            source: Source::Fishman,
        })
        .unwrap()
    }

    fn claims_for(user: &User) -> Claims {
        Claims {
            sub: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            source: user.source,
            sid: "s".into(),
            kind: Default::default(),
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn register_normalizes_and_rejects_duplicates() {
        let svc = service();
        let user = register(&svc, "  Asha@Example.COM ");
        assert_eq!(user.email, "asha@example.com");
        assert_eq!(user.role, Role::Customer);
        assert_eq!(user.phone, None);

        let dup = svc.register(RegisterInput {
            name: "Other".into(),
            email: "asha@example.com".into(),
            password: "longenough".into(),
            phone: None,
            company: None,
            source: Source::Veerix,
        });
        assert!(matches!(dup, Err(AuthError::Conflict(_))));
    }

    #[test]
    fn register_validates_input() {
        let svc = service();
        let short = svc.register(RegisterInput {
            name: "A".into(),
            email: "a@example.com".into(),
            password: "short".into(),
            phone: None,
            company: None,
            source: Source::Veerix,
        });
        assert!(matches!(short, Err(AuthError::Validation(_))));

        let bad_email = svc.register(RegisterInput {
            name: "A".into(),
            email: "not-an-email".into(),
            password: "longenough".into(),
            phone: None,
            company: None,
            source: Source::Veerix,
        });
        assert!(matches!(bad_email, Err(AuthError::Validation(_))));
    }

    #[test]
    fn ensure_admin_is_idempotent() {
        let svc = service();
        let hash = hash_password("admin-password").unwrap();
        let first = svc.ensure_admin("ops@example.com", "Ops", &hash).unwrap();
        let second = svc.ensure_admin("OPS@example.com", "Ops", &hash).unwrap();
        assert_eq!(first.id, second.id);
        assert_eq!(second.role, Role::Admin);
        assert!(svc.ensure_admin("ops@example.com", "Ops", "plain").is_err());
    }

    #[test]
    fn list_filters_by_role_and_source() {
        let svc = service();
        register(&svc, "a@example.com");
        register(&svc, "b@example.com");
        let hash = hash_password("admin-password").unwrap();
        svc.ensure_admin("ops@example.com", "Ops", &hash).unwrap();

        let customers = svc
            .list_users(&ListParams::default(), &UserFilters { role: Some(Role::Customer), source: None })
            .unwrap();
        assert_eq!(customers.total, 2);

        let veerix = svc
            .list_users(&ListParams::default(), &UserFilters { role: None, source: Some(Source::Veerix) })
            .unwrap();
        assert_eq!(veerix.total, 1);

        let searched = svc
            .list_users(&ListParams { q: Some("B@EX".into()), ..Default::default() }, &UserFilters::default())
            .unwrap();
        assert_eq!(searched.total, 1);
    }

    #[test]
    fn customers_edit_only_themselves() {
        let svc = service();
        let a = register(&svc, "a@example.com");
        let b = register(&svc, "b@example.com");
        let ca = claims_for(&a);

        let updated = svc
            .update_user(&ca, &a.id, UserPatch { name: Some("Asha K".into()), ..Default::default() })
            .unwrap();
        assert_eq!(updated.name, "Asha K");

        assert!(matches!(
            svc.update_user(&ca, &b.id, UserPatch::default()),
            Err(AuthError::Forbidden(_))
        ));
        assert!(matches!(
            svc.update_user(&ca, &a.id, UserPatch { active: Some(false), ..Default::default() }),
            Err(AuthError::Forbidden(_))
        ));
    }
}
