use serde::{Deserialize, Serialize};

use super::RecordMeta;

/// Registration-office stage of a trademark application.
///
/// ```text
/// SUBMITTED → NAME_SEARCH → NAME_SELECTED → APPLICATION_FILED
///           → EXAMINATION → PUBLISHED → REGISTERED
/// any non-terminal stage → REFUSED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrackingStatus {
    #[default]
    Submitted,
    NameSearch,
    NameSelected,
    ApplicationFiled,
    Examination,
    Published,
    Registered,
    Refused,
}

impl TrackingStatus {
    /// The linear pipeline, in order. `Refused` is a side exit.
    pub const PIPELINE: [TrackingStatus; 7] = [
        Self::Submitted,
        Self::NameSearch,
        Self::NameSelected,
        Self::ApplicationFiled,
        Self::Examination,
        Self::Published,
        Self::Registered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submitted => "SUBMITTED",
            Self::NameSearch => "NAME_SEARCH",
            Self::NameSelected => "NAME_SELECTED",
            Self::ApplicationFiled => "APPLICATION_FILED",
            Self::Examination => "EXAMINATION",
            Self::Published => "PUBLISHED",
            Self::Registered => "REGISTERED",
            Self::Refused => "REFUSED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Submitted => "Names Submitted",
            Self::NameSearch => "Availability Search",
            Self::NameSelected => "Name Selected",
            Self::ApplicationFiled => "Application Filed",
            Self::Examination => "Under Examination",
            Self::Published => "Published in Trade Marks Journal",
            Self::Registered => "Registered",
            Self::Refused => "Refused",
        }
    }

    /// Next stage of the pipeline, if any.
    pub fn next(&self) -> Option<Self> {
        let pos = Self::PIPELINE.iter().position(|s| s == self)?;
        Self::PIPELINE.get(pos + 1).copied()
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Registered | Self::Refused)
    }
}

impl std::fmt::Display for TrackingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// TrademarkSuggestion: a customer's proposed brand names.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrademarkSuggestion {
    #[serde(flatten)]
    pub meta: RecordMeta,

    /// Candidate names in the customer's order of preference.
    pub names: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// The candidate chosen after the availability search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_number: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_number: Option<String>,

    #[serde(default)]
    pub tracking_status: TrackingStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTrademark {
    pub names: Vec<String>,
    #[serde(default)]
    pub product_category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Owner edits, allowed only while SUBMITTED.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateTrademark {
    #[serde(default)]
    pub names: Option<Vec<String>>,
    #[serde(default)]
    pub product_category: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Data some stages require on entry.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdvanceTrademark {
    #[serde(default)]
    pub selected_name: Option<String>,
    #[serde(default)]
    pub application_number: Option<String>,
    #[serde(default)]
    pub registration_number: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

/// A stage as listed by `GET /trademarks/stages`.
#[derive(Debug, Clone, Serialize)]
pub struct StageInfo {
    pub code: &'static str,
    pub label: &'static str,
}
