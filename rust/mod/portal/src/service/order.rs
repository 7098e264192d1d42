use tracing::{info, warn};

use brandhub_core::{Claims, ListParams, ListResult, ServiceError};

use crate::model::*;
use super::{PortalService, RecordFilter, Tracked, optional, positive_quantity, required};

impl Tracked for Order {
    const SECTION: Section = Section::Orders;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn status_code(&self) -> &'static str {
        Order::status_code(self)
    }

    fn title(&self) -> String {
        format!("{} x {}", self.product_name, self.quantity)
    }

    fn status_label(code: &str) -> &'static str {
        if code == CANCELLED {
            return "Cancelled";
        }
        ORDER_STAGES
            .iter()
            .find(|s| s.code == code)
            .map(|s| s.label)
            .unwrap_or("Unknown")
    }
}

impl PortalService {
    /// Place an order. A referenced brand request must be the caller's own
    /// and paid.
    pub fn place_order(&self, claims: &Claims, input: PlaceOrder) -> Result<Order, ServiceError> {
        let brand_request_id = optional(input.brand_request_id);
        if let Some(req_id) = &brand_request_id {
            let req: BrandRequest = self
                .load(claims, req_id)
                .map_err(|_| ServiceError::Validation(format!("brand request {} not found", req_id)))?;
            if req.meta.owner_id != claims.sub {
                return Err(ServiceError::Validation(format!(
                    "brand request {} belongs to another customer",
                    req_id
                )));
            }
            if req.status != BrandRequestStatus::Paid {
                return Err(ServiceError::Validation(format!(
                    "brand request {} is {}, must be PAID",
                    req_id, req.status
                )));
            }
        }

        let order = Order {
            meta: Self::new_meta(claims),
            product_name: required("productName", &input.product_name)?,
            brand_request_id,
            quantity: positive_quantity(input.quantity)?,
            delivery_address: required("deliveryAddress", &input.delivery_address)?,
            notes: optional(input.notes),
            tracking_step: 0,
            cancelled: false,
            cancel_reason: None,
        };
        self.insert(&order)?;
        info!(id = %order.meta.id, owner = %order.meta.owner_id, "order placed");
        Ok(order)
    }

    pub fn get_order(&self, claims: &Claims, id: &str) -> Result<Order, ServiceError> {
        self.load(claims, id)
    }

    pub fn list_orders(
        &self,
        claims: &Claims,
        filter: &RecordFilter,
        params: &ListParams,
    ) -> Result<ListResult<Order>, ServiceError> {
        self.list(claims, filter, params)
    }

    pub fn advance_order(&self, claims: &Claims, id: &str, input: NoteInput) -> Result<Order, ServiceError> {
        claims.require_admin()?;
        let last = last_step(ORDER_STAGES);
        let order = self.mutate(claims, id, |o: &mut Order| {
            if o.cancelled || o.tracking_step >= last {
                warn!(id = %o.meta.id, status = o.status_code(), "order advance rejected");
                return Err(ServiceError::InvalidTransition(format!(
                    "order is {}, cannot advance",
                    o.status_code()
                )));
            }
            o.tracking_step += 1;
            Ok(optional(input.note))
        })?;
        info!(id, step = %order.tracking_label(), "order advanced");
        Ok(order)
    }

    /// Owner or admin, before manufacturing starts.
    pub fn cancel_order(&self, claims: &Claims, id: &str, input: ReasonInput) -> Result<Order, ServiceError> {
        let reason = required("reason", &input.reason)?;
        let order = self.mutate(claims, id, |o: &mut Order| {
            if o.cancelled || o.tracking_step > LAST_CANCELLABLE_STEP {
                return Err(ServiceError::InvalidTransition(format!(
                    "order is {}, cannot cancel",
                    o.status_code()
                )));
            }
            o.cancelled = true;
            o.cancel_reason = Some(reason.clone());
            Ok(Some(reason))
        })?;
        info!(id, by = %claims.sub, "order cancelled");
        Ok(order)
    }
}
