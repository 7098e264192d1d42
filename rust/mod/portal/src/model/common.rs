use serde::{Deserialize, Serialize};

use brandhub_core::Source;

/// Fields every portal record carries. Flattened into the record's JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecordMeta {
    /// UUID primary key.
    pub id: String,

    /// Customer who submitted the record.
    pub owner_id: String,

    /// Customer display name at submission time.
    pub owner_name: String,

    /// Brand portal the record was submitted through.
    #[serde(default)]
    pub source: Source,

    pub created_at: String,

    pub updated_at: String,

    /// User id of the last writer. Notification badges skip the caller's
    /// own writes.
    pub last_actor: String,

    /// Every status change, oldest first.
    #[serde(default)]
    pub history: Vec<StatusChange>,
}

/// One entry of a record's status timeline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub from: String,
    pub to: String,
    pub at: String,
    /// User id of whoever made the change.
    pub by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A named step of a numeric tracking counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    /// Stable machine code, stored in the `status` column.
    pub code: &'static str,
    /// Human-readable label shown on the tracking timeline.
    pub label: &'static str,
}

/// Look up the stage for a step index.
pub fn stage_at(stages: &'static [Stage], step: u8) -> Option<&'static Stage> {
    stages.get(step as usize)
}

/// Index of the last stage.
pub fn last_step(stages: &[Stage]) -> u8 {
    (stages.len() - 1) as u8
}

/// Body for actions that accept only an optional note.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoteInput {
    #[serde(default)]
    pub note: Option<String>,
}

/// Body for actions that require a reason (reject, refuse, cancel).
#[derive(Debug, Clone, Deserialize)]
pub struct ReasonInput {
    pub reason: String,
}
