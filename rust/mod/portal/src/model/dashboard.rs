use std::collections::BTreeMap;

use serde::Serialize;

use super::Section;

/// Count of records in one status.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StatusCount {
    pub status: String,
    pub label: &'static str,
    pub count: usize,
}

/// Per-collection status breakdown.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    pub total: usize,
    pub by_status: Vec<StatusCount>,
}

/// One row of the recent-activity feed.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentItem {
    pub kind: &'static str,
    pub id: String,
    pub title: String,
    pub status: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct DashboardSummary {
    pub collections: BTreeMap<Section, CollectionSummary>,
    pub recent: Vec<RecentItem>,
}
