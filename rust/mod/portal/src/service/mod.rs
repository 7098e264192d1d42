pub mod brand;
pub mod brand_request;
pub mod dashboard;
pub mod notification;
pub mod order;
pub mod packing_design;
pub mod schema;
pub mod trademark;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use brandhub_blob::{BlobError, BlobStore};
use brandhub_core::{Claims, ListParams, ListResult, ServiceError, Source, new_id, now_rfc3339};
use brandhub_kv::{KVError, KVStore};
use brandhub_sql::{Row, SQLError, SQLStore, Value};

use crate::model::{BrandProfile, RecordMeta, Section, StatusChange};

/// Default cap on a single design file upload (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Configuration for the portal service.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Largest accepted design file, in bytes.
    pub max_upload_bytes: usize,
    /// Brand profile overrides; sources not listed use the built-in profile.
    pub brands: Vec<BrandProfile>,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            brands: Vec::new(),
        }
    }
}

/// Portal service: holds the storage backends and the business rules for
/// every portal collection.
pub struct PortalService {
    pub(crate) sql: Arc<dyn SQLStore>,
    pub(crate) kv: Arc<dyn KVStore>,
    pub(crate) blob: Arc<dyn BlobStore>,
    pub(crate) config: PortalConfig,
}

/// A portal record stored in its collection's table.
pub trait Tracked: Serialize + DeserializeOwned {
    const SECTION: Section;

    fn meta(&self) -> &RecordMeta;

    fn meta_mut(&mut self) -> &mut RecordMeta;

    /// Code stored in the `status` column and in history entries.
    fn status_code(&self) -> &'static str;

    /// Short text for lists, search and the activity feed.
    fn title(&self) -> String;

    /// Human label for a status code of this collection.
    fn status_label(code: &str) -> &'static str;
}

/// Filters accepted by every collection list.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub status: Option<String>,
    pub source: Option<Source>,
    /// Admin only; ignored for customers, who always see their own records.
    pub owner_id: Option<String>,
}

impl PortalService {
    /// Create a new PortalService, initializing the DB schema.
    pub fn new(
        sql: Arc<dyn SQLStore>,
        kv: Arc<dyn KVStore>,
        blob: Arc<dyn BlobStore>,
        config: PortalConfig,
    ) -> Result<Arc<Self>, ServiceError> {
        schema::init_schema(sql.as_ref())?;
        Ok(Arc::new(Self { sql, kv, blob, config }))
    }

    pub fn config(&self) -> &PortalConfig {
        &self.config
    }

    // ── Record helpers ──

    /// Fresh metadata for a record submitted by `claims`.
    pub(crate) fn new_meta(claims: &Claims) -> RecordMeta {
        let now = now_rfc3339();
        RecordMeta {
            id: new_id(),
            owner_id: claims.sub.clone(),
            owner_name: claims.name.clone(),
            source: claims.source,
            created_at: now.clone(),
            updated_at: now,
            last_actor: claims.sub.clone(),
            history: Vec::new(),
        }
    }

    pub(crate) fn insert<T: Tracked>(&self, record: &T) -> Result<(), ServiceError> {
        let meta = record.meta();
        let sql = format!(
            "INSERT INTO {} (id, owner_id, source, status, last_actor, title, data, create_at, update_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            T::SECTION.as_str()
        );
        self.sql
            .exec(
                &sql,
                &[
                    Value::Text(meta.id.clone()),
                    Value::Text(meta.owner_id.clone()),
                    Value::Text(meta.source.as_str().into()),
                    Value::Text(record.status_code().into()),
                    Value::Text(meta.last_actor.clone()),
                    Value::Text(record.title()),
                    Value::Text(to_json(record)?),
                    Value::Text(meta.created_at.clone()),
                    Value::Text(meta.updated_at.clone()),
                ],
            )
            .map_err(sql_err)?;
        debug!(section = %T::SECTION, id = %meta.id, "record inserted");
        Ok(())
    }

    /// Load a record the caller may see. Records owned by someone else are
    /// reported as missing.
    pub(crate) fn load<T: Tracked>(&self, claims: &Claims, id: &str) -> Result<T, ServiceError> {
        let sql = format!("SELECT data FROM {} WHERE id = ?1", T::SECTION.as_str());
        let rows = self.sql.query(&sql, &[Value::Text(id.to_string())]).map_err(sql_err)?;
        let record: T = match rows.first() {
            Some(row) => decode_row(row)?,
            None => return Err(not_found(T::SECTION, id)),
        };
        if !claims.can_access(&record.meta().owner_id) {
            return Err(not_found(T::SECTION, id));
        }
        Ok(record)
    }

    /// Load, apply `f`, and write back.
    ///
    /// `f` returns an optional note. A history entry is appended when the
    /// status code changed or a note was given. The write only succeeds if
    /// nobody else updated the record in between.
    pub(crate) fn mutate<T, F>(&self, claims: &Claims, id: &str, f: F) -> Result<T, ServiceError>
    where
        T: Tracked,
        F: FnOnce(&mut T) -> Result<Option<String>, ServiceError>,
    {
        let mut record: T = self.load(claims, id)?;
        let before = record.status_code();
        let expected = record.meta().updated_at.clone();

        let note = f(&mut record)?;

        let after = record.status_code();
        let now = now_rfc3339();
        {
            let meta = record.meta_mut();
            if before != after || note.is_some() {
                meta.history.push(StatusChange {
                    from: before.to_string(),
                    to: after.to_string(),
                    at: now.clone(),
                    by: claims.sub.clone(),
                    note,
                });
            }
            meta.updated_at = now;
            meta.last_actor = claims.sub.clone();
        }

        let meta = record.meta();
        let sql = format!(
            "UPDATE {} SET data = ?1, status = ?2, last_actor = ?3, title = ?4, update_at = ?5
             WHERE id = ?6 AND update_at = ?7",
            T::SECTION.as_str()
        );
        let changed = self
            .sql
            .exec(
                &sql,
                &[
                    Value::Text(to_json(&record)?),
                    Value::Text(after.into()),
                    Value::Text(meta.last_actor.clone()),
                    Value::Text(record.title()),
                    Value::Text(meta.updated_at.clone()),
                    Value::Text(meta.id.clone()),
                    Value::Text(expected),
                ],
            )
            .map_err(sql_err)?;
        if changed == 0 {
            return Err(ServiceError::Conflict(format!(
                "{}/{} was modified concurrently, reload and retry",
                T::SECTION,
                id
            )));
        }
        if before != after {
            debug!(section = %T::SECTION, id, from = before, to = after, "status changed");
        }
        Ok(record)
    }

    pub(crate) fn list<T: Tracked>(
        &self,
        claims: &Claims,
        filter: &RecordFilter,
        params: &ListParams,
    ) -> Result<ListResult<T>, ServiceError> {
        let table = T::SECTION.as_str();
        let mut w = Where::scoped(claims, filter.source);
        if claims.is_admin() {
            if let Some(owner) = filter.owner_id.as_deref().filter(|o| !o.is_empty()) {
                w.eq("owner_id", Value::Text(owner.into()));
            }
        }
        if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
            w.eq("status", Value::Text(status.to_ascii_uppercase()));
        }
        if let Some(q) = params.q.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            w.args.push(Value::Text(format!("%{}%", q.to_lowercase())));
            w.clauses.push(format!("lower(title) LIKE ?{}", w.args.len()));
        }
        let where_sql = w.sql();

        let count_rows = self
            .sql
            .query(&format!("SELECT COUNT(*) AS cnt FROM {}{}", table, where_sql), &w.args)
            .map_err(sql_err)?;
        let total = count_rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize;

        let mut page_args = w.args.clone();
        page_args.push(Value::Integer(params.clamped_limit() as i64));
        page_args.push(Value::Integer(params.offset as i64));
        let sql = format!(
            "SELECT data FROM {}{} ORDER BY update_at DESC, id LIMIT ?{} OFFSET ?{}",
            table,
            where_sql,
            page_args.len() - 1,
            page_args.len(),
        );
        let items = self
            .sql
            .query(&sql, &page_args)
            .map_err(sql_err)?
            .iter()
            .map(decode_row)
            .collect::<Result<Vec<T>, _>>()?;

        Ok(ListResult { items, total })
    }

    /// Delete a record row. Only succeeds if the record is unchanged since
    /// `expected_update_at` was read.
    pub(crate) fn remove(&self, section: Section, id: &str, expected_update_at: &str) -> Result<(), ServiceError> {
        let sql = format!("DELETE FROM {} WHERE id = ?1 AND update_at = ?2", section.as_str());
        let n = self
            .sql
            .exec(&sql, &[Value::Text(id.into()), Value::Text(expected_update_at.into())])
            .map_err(sql_err)?;
        if n == 0 {
            return Err(ServiceError::Conflict(format!(
                "{}/{} was modified concurrently, reload and retry",
                section, id
            )));
        }
        debug!(%section, id, "record deleted");
        Ok(())
    }
}

/// WHERE-clause builder with numbered placeholders.
#[derive(Debug, Default)]
pub(crate) struct Where {
    pub clauses: Vec<String>,
    pub args: Vec<Value>,
}

impl Where {
    /// Restrict to what `claims` may see, optionally to one source.
    pub fn scoped(claims: &Claims, source: Option<Source>) -> Self {
        let mut w = Self::default();
        if !claims.is_admin() {
            w.eq("owner_id", Value::Text(claims.sub.clone()));
        }
        if let Some(source) = source {
            w.eq("source", Value::Text(source.as_str().into()));
        }
        w
    }

    pub fn eq(&mut self, column: &str, value: Value) {
        self.args.push(value);
        self.clauses.push(format!("{} = ?{}", column, self.args.len()));
    }

    pub fn sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }
}

// ── Validation helpers ──

/// Trimmed, non-empty required text field.
pub(crate) fn required(field: &str, value: &str) -> Result<String, ServiceError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ServiceError::Validation(format!("{} is required", field)));
    }
    Ok(v.to_string())
}

/// Trimmed optional text; blank becomes `None`.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

pub(crate) fn positive_quantity(quantity: u64) -> Result<u64, ServiceError> {
    if quantity == 0 {
        return Err(ServiceError::Validation("quantity must be greater than 0".into()));
    }
    Ok(quantity)
}

/// Fail unless the caller owns the record.
pub(crate) fn require_owner(claims: &Claims, meta: &RecordMeta, action: &str) -> Result<(), ServiceError> {
    if claims.sub != meta.owner_id {
        return Err(ServiceError::PermissionDenied(format!(
            "only the owner can {}",
            action
        )));
    }
    Ok(())
}

pub(crate) fn not_found(section: Section, id: &str) -> ServiceError {
    ServiceError::NotFound(format!("{}/{}", section, id))
}

// ── Storage error mapping ──

pub(crate) fn sql_err(e: SQLError) -> ServiceError {
    match e {
        SQLError::Constraint(m) => ServiceError::Conflict(m),
        other => ServiceError::Storage(other.to_string()),
    }
}

pub(crate) fn kv_err(e: KVError) -> ServiceError {
    ServiceError::Storage(e.to_string())
}

pub(crate) fn blob_err(e: BlobError) -> ServiceError {
    match e {
        BlobError::InvalidKey(k) => ServiceError::Validation(format!("invalid file key: {}", k)),
        other => ServiceError::Storage(other.to_string()),
    }
}

fn to_json<T: Serialize>(record: &T) -> Result<String, ServiceError> {
    serde_json::to_string(record).map_err(|e| ServiceError::Internal(e.to_string()))
}

pub(crate) fn decode_row<T: DeserializeOwned>(row: &Row) -> Result<T, ServiceError> {
    let data = row
        .get_str("data")
        .ok_or_else(|| ServiceError::Internal("missing data column".into()))?;
    serde_json::from_str(data).map_err(|e| ServiceError::Internal(e.to_string()))
}
