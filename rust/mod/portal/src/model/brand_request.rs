use serde::{Deserialize, Serialize};

use super::RecordMeta;

/// Brand request status.
///
/// ```text
/// PENDING → APPROVED → REQUESTED_PAYMENT → PAID
///         → REJECTED
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BrandRequestStatus {
    #[default]
    Pending,
    Approved,
    RequestedPayment,
    Paid,
    Rejected,
}

impl BrandRequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Approved => "APPROVED",
            Self::RequestedPayment => "REQUESTED_PAYMENT",
            Self::Paid => "PAID",
            Self::Rejected => "REJECTED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Approved => "Approved",
            Self::RequestedPayment => "Requested Payment",
            Self::Paid => "Paid",
            Self::Rejected => "Rejected",
        }
    }

    /// Whether `self → to` is an edge of the state machine.
    pub fn can_transition_to(&self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::Pending, Self::Approved)
                | (Self::Pending, Self::Rejected)
                | (Self::Approved, Self::RequestedPayment)
                | (Self::RequestedPayment, Self::Paid)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Paid | Self::Rejected)
    }
}

impl std::fmt::Display for BrandRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// BrandRequest: a customer's quote request for a molecule.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrandRequest {
    #[serde(flatten)]
    pub meta: RecordMeta,

    /// Molecule / API name, e.g. "Paracetamol".
    pub molecule: String,

    /// Tablet, capsule, syrup, ...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage_form: Option<String>,

    /// e.g. "500 mg".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<String>,

    /// Requested quantity in units.
    pub quantity: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub status: BrandRequestStatus,

    /// Set on approval.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quoted_price: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_reference: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBrandRequest {
    pub molecule: String,
    #[serde(default)]
    pub dosage_form: Option<String>,
    #[serde(default)]
    pub strength: Option<String>,
    pub quantity: u64,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Owner edits, allowed only while PENDING.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateBrandRequest {
    #[serde(default)]
    pub molecule: Option<String>,
    #[serde(default)]
    pub dosage_form: Option<String>,
    #[serde(default)]
    pub strength: Option<String>,
    #[serde(default)]
    pub quantity: Option<u64>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApproveInput {
    pub quoted_price: f64,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkPaidInput {
    #[serde(default)]
    pub payment_reference: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
