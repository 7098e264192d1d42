use tracing::debug;

use brandhub_core::{Claims, ServiceError, now_rfc3339};
use brandhub_sql::Value;

use crate::model::{Badges, Section};
use super::{PortalService, Where, kv_err, sql_err};

/// KV key of a user's "seen" mark for one section.
pub fn seen_key(user_id: &str, section: Section) -> String {
    format!("seen/{}/{}", user_id, section.as_str())
}

impl PortalService {
    /// Count records changed by someone else since the caller last looked.
    pub fn badges(&self, claims: &Claims) -> Result<Badges, ServiceError> {
        let mut badges = Badges::default();
        for section in Section::ALL {
            let seen = self
                .kv
                .get_string(&seen_key(&claims.sub, section))
                .map_err(kv_err)?;
            let count = self.count_unseen(claims, section, seen.as_deref())?;
            badges.total += count;
            badges.sections.insert(section, count);
        }
        Ok(badges)
    }

    fn count_unseen(&self, claims: &Claims, section: Section, seen: Option<&str>) -> Result<usize, ServiceError> {
        let mut w = Where::scoped(claims, None);
        w.args.push(Value::Text(claims.sub.clone()));
        w.clauses.push(format!("last_actor != ?{}", w.args.len()));
        if let Some(seen) = seen {
            w.args.push(Value::Text(seen.to_string()));
            w.clauses.push(format!("update_at > ?{}", w.args.len()));
        }
        let rows = self
            .sql
            .query(&format!("SELECT COUNT(*) AS cnt FROM {}{}", section.as_str(), w.sql()), &w.args)
            .map_err(sql_err)?;
        Ok(rows.first().and_then(|r| r.get_i64("cnt")).unwrap_or(0) as usize)
    }

    /// Record that the caller has looked at `section` now.
    pub fn mark_seen(&self, claims: &Claims, section: &str) -> Result<(), ServiceError> {
        let section: Section = section.parse()?;
        let now = now_rfc3339();
        self.kv
            .set(&seen_key(&claims.sub, section), now.as_bytes())
            .map_err(kv_err)?;
        debug!(user = %claims.sub, %section, "section marked seen");
        Ok(())
    }

    pub fn mark_all_seen(&self, claims: &Claims) -> Result<(), ServiceError> {
        let now = now_rfc3339();
        let keys: Vec<String> = Section::ALL.iter().map(|s| seen_key(&claims.sub, *s)).collect();
        let entries: Vec<(&str, &[u8])> = keys.iter().map(|k| (k.as_str(), now.as_bytes())).collect();
        self.kv.set_many(&entries).map_err(kv_err)?;
        debug!(user = %claims.sub, "all sections marked seen");
        Ok(())
    }
}
