pub mod password;
pub mod schema;
pub mod session;
pub mod user;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use brandhub_core::ServiceError;
use brandhub_sql::{SQLError, SQLStore, Value};

/// Auth service error type.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("storage: {0}")]
    Storage(String),

    #[error("internal: {0}")]
    Internal(String),
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::NotFound(m) => ServiceError::NotFound(m),
            AuthError::Conflict(m) => ServiceError::Conflict(m),
            AuthError::Validation(m) => ServiceError::Validation(m),
            AuthError::Unauthorized(m) => ServiceError::Unauthorized(m),
            AuthError::Forbidden(m) => ServiceError::PermissionDenied(m),
            AuthError::Storage(m) => ServiceError::Storage(m),
            AuthError::Internal(m) => ServiceError::Internal(m),
        }
    }
}

impl From<SQLError> for AuthError {
    fn from(e: SQLError) -> Self {
        match e {
            SQLError::Constraint(m) => AuthError::Conflict(m),
            other => AuthError::Storage(other.to_string()),
        }
    }
}

/// Configuration for the auth service.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// JWT signing secret (HS256).
    pub jwt_secret: String,
    /// Access token lifetime in seconds (default: 24h).
    pub access_token_ttl: i64,
    /// Refresh token lifetime in seconds (default: 7 days).
    pub refresh_token_ttl: i64,
    /// Minimum accepted password length at registration.
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "brandhub-dev-secret-change-me".to_string(),
            access_token_ttl: 86400,
            refresh_token_ttl: 604800,
            min_password_len: 8,
        }
    }
}

/// The Auth service. Holds the SQL store and token configuration.
pub struct AuthService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) config: AuthConfig,
}

impl AuthService {
    /// Create a new AuthService, initializing the DB schema.
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Arc<Self>, AuthError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, config }))
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    // ── Record helpers: JSON `data` column plus indexed columns ──

    pub(crate) fn insert_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), AuthError> {
        let json = serde_json::to_string(record).map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut cols = vec!["id", "data"];
        let mut placeholders = vec!["?1".to_string(), "?2".to_string()];
        let mut params = vec![Value::Text(id.to_string()), Value::Text(json)];

        for (i, (col, val)) in indexes.iter().enumerate() {
            cols.push(col);
            placeholders.push(format!("?{}", i + 3));
            params.push(val.clone());
        }

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            table,
            cols.join(", "),
            placeholders.join(", "),
        );
        self.sql.exec(&sql, &params)?;
        Ok(())
    }

    pub(crate) fn get_record<T: DeserializeOwned>(&self, table: &str, id: &str) -> Result<T, AuthError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", table);
        let rows = self.sql.query(&sql, &[Value::Text(id.to_string())])?;
        let row = rows
            .first()
            .ok_or_else(|| AuthError::NotFound(format!("{}/{}", table, id)))?;
        decode_row(row)
    }

    pub(crate) fn update_record<T: Serialize>(
        &self,
        table: &str,
        id: &str,
        record: &T,
        indexes: &[(&str, Value)],
    ) -> Result<(), AuthError> {
        let json = serde_json::to_string(record).map_err(|e| AuthError::Internal(e.to_string()))?;

        let mut sets = vec!["data = ?1".to_string()];
        let mut params: Vec<Value> = vec![Value::Text(json)];
        for (i, (col, val)) in indexes.iter().enumerate() {
            sets.push(format!("{} = ?{}", col, i + 2));
            params.push(val.clone());
        }
        params.push(Value::Text(id.to_string()));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            table,
            sets.join(", "),
            params.len(),
        );
        if self.sql.exec(&sql, &params)? == 0 {
            return Err(AuthError::NotFound(format!("{}/{}", table, id)));
        }
        Ok(())
    }
}

pub(crate) fn decode_row<T: DeserializeOwned>(row: &brandhub_sql::Row) -> Result<T, AuthError> {
    let data = row
        .get_str("data")
        .ok_or_else(|| AuthError::Internal("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| AuthError::Internal(e.to_string()))
}
