use serde::{Deserialize, Serialize};

use super::{RecordMeta, Stage, stage_at};

/// Design approval steps (`trackingStep`).
pub const TRACKING_STAGES: &[Stage] = &[
    Stage { code: "RECEIVED", label: "Design Received" },
    Stage { code: "UNDER_REVIEW", label: "Under Review" },
    Stage { code: "PROOF_SHARED", label: "Proof Shared" },
    Stage { code: "CUSTOMER_APPROVED", label: "Approved by Customer" },
    Stage { code: "SENT_FOR_PRINT", label: "Sent for Printing" },
];

/// Steps after the design goes to print (`postPrintStep`).
pub const POST_PRINT_STAGES: &[Stage] = &[
    Stage { code: "PRINTING", label: "Printing" },
    Stage { code: "QUALITY_CHECK", label: "Quality Check" },
    Stage { code: "DISPATCHED", label: "Dispatched" },
    Stage { code: "DELIVERED", label: "Delivered" },
];

pub const STEP_RECEIVED: u8 = 0;
pub const STEP_UNDER_REVIEW: u8 = 1;
pub const STEP_PROOF_SHARED: u8 = 2;
pub const STEP_CUSTOMER_APPROVED: u8 = 3;
pub const STEP_SENT_FOR_PRINT: u8 = 4;

/// An uploaded artwork or proof file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DesignFile {
    /// Blob key, unique per file.
    pub key: String,
    /// Sanitised original file name.
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_at: String,
    pub uploaded_by: String,
}

/// PackingDesign: packaging artwork moving through review and print.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PackingDesign {
    #[serde(flatten)]
    pub meta: RecordMeta,

    pub product_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub files: Vec<DesignFile>,

    /// Index into [`TRACKING_STAGES`].
    #[serde(default)]
    pub tracking_step: u8,

    /// Index into [`POST_PRINT_STAGES`]; absent until sent for printing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_print_step: Option<u8>,

    /// Latest change request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl PackingDesign {
    /// Current stage: the post-print stage once printing started, the
    /// tracking stage before.
    pub fn stage(&self) -> &'static Stage {
        let stage = match self.post_print_step {
            Some(step) => stage_at(POST_PRINT_STAGES, step),
            None => stage_at(TRACKING_STAGES, self.tracking_step),
        };
        stage.unwrap_or(&TRACKING_STAGES[0])
    }

    pub fn tracking_label(&self) -> &'static str {
        stage_at(TRACKING_STAGES, self.tracking_step)
            .map(|s| s.label)
            .unwrap_or_default()
    }

    pub fn post_print_label(&self) -> Option<&'static str> {
        self.post_print_step
            .and_then(|s| stage_at(POST_PRINT_STAGES, s))
            .map(|s| s.label)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePackingDesign {
    pub product_name: String,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeedbackInput {
    pub feedback: String,
}

/// API view with the step labels resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingDesignView {
    #[serde(flatten)]
    pub design: PackingDesign,
    pub tracking_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_print_label: Option<&'static str>,
}

impl From<PackingDesign> for PackingDesignView {
    fn from(design: PackingDesign) -> Self {
        Self {
            tracking_label: design.tracking_label(),
            post_print_label: design.post_print_label(),
            design,
        }
    }
}
