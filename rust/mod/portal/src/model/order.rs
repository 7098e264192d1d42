use serde::{Deserialize, Serialize};

use super::{RecordMeta, Stage, stage_at};

/// Manufacturing order tracking steps (`trackingStep`).
pub const ORDER_STAGES: &[Stage] = &[
    Stage { code: "PLACED", label: "Order Placed" },
    Stage { code: "RAW_MATERIAL", label: "Raw Material Procurement" },
    Stage { code: "MANUFACTURING", label: "Manufacturing" },
    Stage { code: "QUALITY_TESTING", label: "Quality Testing" },
    Stage { code: "PACKAGING", label: "Packaging" },
    Stage { code: "DISPATCHED", label: "Dispatched" },
    Stage { code: "DELIVERED", label: "Delivered" },
];

pub const CANCELLED: &str = "CANCELLED";

/// Orders may be cancelled up to and including this step.
pub const LAST_CANCELLABLE_STEP: u8 = 1;

/// Order: a manufacturing order for a private-label product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(flatten)]
    pub meta: RecordMeta,

    pub product_name: String,

    /// The paid brand request this order fulfils, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand_request_id: Option<String>,

    pub quantity: u64,

    pub delivery_address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Index into [`ORDER_STAGES`].
    #[serde(default)]
    pub tracking_step: u8,

    #[serde(default)]
    pub cancelled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
}

impl Order {
    /// Status code stored in the index column.
    pub fn status_code(&self) -> &'static str {
        if self.cancelled {
            return CANCELLED;
        }
        stage_at(ORDER_STAGES, self.tracking_step)
            .map(|s| s.code)
            .unwrap_or(ORDER_STAGES[0].code)
    }

    pub fn tracking_label(&self) -> &'static str {
        if self.cancelled {
            return "Cancelled";
        }
        stage_at(ORDER_STAGES, self.tracking_step)
            .map(|s| s.label)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrder {
    pub product_name: String,
    #[serde(default)]
    pub brand_request_id: Option<String>,
    pub quantity: u64,
    pub delivery_address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

/// API view with the step label resolved.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub tracking_label: &'static str,
}

impl From<Order> for OrderView {
    fn from(order: Order) -> Self {
        Self {
            tracking_label: order.tracking_label(),
            order,
        }
    }
}
