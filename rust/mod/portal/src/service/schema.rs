use brandhub_core::ServiceError;
use brandhub_sql::SQLStore;

use crate::model::Section;

/// Initialize one table per portal collection.
///
/// All collections share the same layout: the record as JSON in `data`,
/// plus the columns lists, badges and the dashboard filter on.
pub fn init_schema(sql: &dyn SQLStore) -> Result<(), ServiceError> {
    for section in Section::ALL {
        let t = section.as_str();
        sql.exec_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {t} (
                id TEXT PRIMARY KEY,
                owner_id TEXT NOT NULL,
                source TEXT NOT NULL,
                status TEXT NOT NULL,
                last_actor TEXT NOT NULL,
                title TEXT NOT NULL,
                data TEXT NOT NULL,
                create_at TEXT NOT NULL,
                update_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_{t}_owner ON {t}(owner_id);
            CREATE INDEX IF NOT EXISTS idx_{t}_status ON {t}(status);
            CREATE INDEX IF NOT EXISTS idx_{t}_update ON {t}(update_at);"
        ))
        .map_err(|e| ServiceError::Storage(e.to_string()))?;
    }
    Ok(())
}
