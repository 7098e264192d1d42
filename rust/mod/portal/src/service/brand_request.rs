use tracing::{info, warn};

use brandhub_core::{Claims, ListParams, ListResult, ServiceError};

use crate::model::*;
use super::{
    PortalService, RecordFilter, Tracked, optional, positive_quantity, require_owner, required,
};

/// Currency applied when an approval names none.
pub const DEFAULT_CURRENCY: &str = "INR";

impl Tracked for BrandRequest {
    const SECTION: Section = Section::BrandRequests;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn status_code(&self) -> &'static str {
        self.status.as_str()
    }

    fn title(&self) -> String {
        match &self.strength {
            Some(s) => format!("{} {}", self.molecule, s),
            None => self.molecule.clone(),
        }
    }

    fn status_label(code: &str) -> &'static str {
        use BrandRequestStatus::*;
        [Pending, Approved, RequestedPayment, Paid, Rejected]
            .into_iter()
            .find(|s| s.as_str() == code)
            .map(|s| s.label())
            .unwrap_or("Unknown")
    }
}

fn check_transition(
    req: &BrandRequest,
    to: BrandRequestStatus,
    action: &str,
) -> Result<(), ServiceError> {
    if req.status.can_transition_to(to) {
        return Ok(());
    }
    warn!(id = %req.meta.id, from = %req.status, to = %to, "brand request transition rejected");
    let message = if req.status.is_terminal() {
        format!("brand request is {} and closed, cannot {}", req.status, action)
    } else {
        format!("brand request is {}, cannot {}", req.status, action)
    };
    Err(ServiceError::InvalidTransition(message))
}

impl PortalService {
    pub fn create_brand_request(
        &self,
        claims: &Claims,
        input: CreateBrandRequest,
    ) -> Result<BrandRequest, ServiceError> {
        let req = BrandRequest {
            meta: Self::new_meta(claims),
            molecule: required("molecule", &input.molecule)?,
            dosage_form: optional(input.dosage_form),
            strength: optional(input.strength),
            quantity: positive_quantity(input.quantity)?,
            notes: optional(input.notes),
            status: BrandRequestStatus::Pending,
            quoted_price: None,
            currency: None,
            payment_reference: None,
            rejection_reason: None,
        };
        self.insert(&req)?;
        info!(id = %req.meta.id, owner = %req.meta.owner_id, molecule = %req.molecule, "brand request submitted");
        Ok(req)
    }

    pub fn get_brand_request(&self, claims: &Claims, id: &str) -> Result<BrandRequest, ServiceError> {
        self.load(claims, id)
    }

    pub fn list_brand_requests(
        &self,
        claims: &Claims,
        filter: &RecordFilter,
        params: &ListParams,
    ) -> Result<ListResult<BrandRequest>, ServiceError> {
        self.list(claims, filter, params)
    }

    /// Owner edit, only while the request is still pending.
    pub fn update_brand_request(
        &self,
        claims: &Claims,
        id: &str,
        patch: UpdateBrandRequest,
    ) -> Result<BrandRequest, ServiceError> {
        self.mutate(claims, id, |req: &mut BrandRequest| {
            require_owner(claims, &req.meta, "edit a brand request")?;
            if req.status != BrandRequestStatus::Pending {
                return Err(ServiceError::InvalidTransition(format!(
                    "brand request is {}, only PENDING requests can be edited",
                    req.status
                )));
            }
            if let Some(m) = patch.molecule {
                req.molecule = required("molecule", &m)?;
            }
            if let Some(q) = patch.quantity {
                req.quantity = positive_quantity(q)?;
            }
            if patch.dosage_form.is_some() {
                req.dosage_form = optional(patch.dosage_form);
            }
            if patch.strength.is_some() {
                req.strength = optional(patch.strength);
            }
            if patch.notes.is_some() {
                req.notes = optional(patch.notes);
            }
            Ok(None)
        })
    }

    /// Owner or admin, only while pending.
    pub fn delete_brand_request(&self, claims: &Claims, id: &str) -> Result<(), ServiceError> {
        let req: BrandRequest = self.load(claims, id)?;
        if req.status != BrandRequestStatus::Pending {
            return Err(ServiceError::InvalidTransition(format!(
                "brand request is {}, only PENDING requests can be deleted",
                req.status
            )));
        }
        self.remove(Section::BrandRequests, id, &req.meta.updated_at)
    }

    pub fn approve_brand_request(
        &self,
        claims: &Claims,
        id: &str,
        input: ApproveInput,
    ) -> Result<BrandRequest, ServiceError> {
        claims.require_admin()?;
        if !(input.quoted_price.is_finite() && input.quoted_price > 0.0) {
            return Err(ServiceError::Validation("quotedPrice must be greater than 0".into()));
        }
        let currency = optional(input.currency)
            .map(|c| c.to_ascii_uppercase())
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

        let req = self.mutate(claims, id, |req: &mut BrandRequest| {
            check_transition(req, BrandRequestStatus::Approved, "approve")?;
            req.status = BrandRequestStatus::Approved;
            req.quoted_price = Some(input.quoted_price);
            req.currency = Some(currency);
            Ok(optional(input.note))
        })?;
        info!(id, price = input.quoted_price, "brand request approved");
        Ok(req)
    }

    pub fn request_payment(
        &self,
        claims: &Claims,
        id: &str,
        input: NoteInput,
    ) -> Result<BrandRequest, ServiceError> {
        claims.require_admin()?;
        self.mutate(claims, id, |req: &mut BrandRequest| {
            check_transition(req, BrandRequestStatus::RequestedPayment, "request payment")?;
            req.status = BrandRequestStatus::RequestedPayment;
            Ok(optional(input.note))
        })
    }

    pub fn mark_paid(
        &self,
        claims: &Claims,
        id: &str,
        input: MarkPaidInput,
    ) -> Result<BrandRequest, ServiceError> {
        claims.require_admin()?;
        let req = self.mutate(claims, id, |req: &mut BrandRequest| {
            check_transition(req, BrandRequestStatus::Paid, "mark as paid")?;
            req.status = BrandRequestStatus::Paid;
            req.payment_reference = optional(input.payment_reference);
            Ok(optional(input.note))
        })?;
        info!(id, "brand request paid");
        Ok(req)
    }

    pub fn reject_brand_request(
        &self,
        claims: &Claims,
        id: &str,
        input: ReasonInput,
    ) -> Result<BrandRequest, ServiceError> {
        claims.require_admin()?;
        let reason = required("reason", &input.reason)?;
        self.mutate(claims, id, |req: &mut BrandRequest| {
            check_transition(req, BrandRequestStatus::Rejected, "reject")?;
            req.status = BrandRequestStatus::Rejected;
            req.rejection_reason = Some(reason.clone());
            Ok(Some(reason))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::*;

    fn create(f: &Fixture, claims: &Claims) -> BrandRequest {
        f.svc
            .create_brand_request(
                claims,
                CreateBrandRequest {
                    molecule: "  Paracetamol ".into(),
                    dosage_form: Some("Tablet".into()),
                    strength: Some("500 mg".into()),
                    quantity: 10_000,
                    notes: Some("  ".into()),
                },
            )
            .unwrap()
    }

    fn approve(price: f64) -> ApproveInput {
        ApproveInput { quoted_price: price, currency: None, note: None }
    }

    #[test]
    fn create_trims_and_defaults() {
        let f = fixture();
        let req = create(&f, &customer("c1"));
        assert_eq!(req.molecule, "Paracetamol");
        assert_eq!(req.notes, None);
        assert_eq!(req.status, BrandRequestStatus::Pending);
        assert_eq!(req.meta.owner_id, "c1");
        assert_eq!(req.meta.last_actor, "c1");
        assert!(req.meta.history.is_empty());
    }

    #[test]
    fn create_rejects_zero_quantity() {
        let f = fixture();
        let err = f
            .svc
            .create_brand_request(
                &customer("c1"),
                CreateBrandRequest {
                    molecule: "Ibuprofen".into(),
                    dosage_form: None,
                    strength: None,
                    quantity: 0,
                    notes: None,
                },
            )
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn full_lifecycle() {
        let f = fixture();
        let c = customer("c1");
        let a = admin();
        let req = create(&f, &c);
        let id = req.meta.id.as_str();

        let req = f.svc.approve_brand_request(&a, id, approve(12.5)).unwrap();
        assert_eq!(req.status, BrandRequestStatus::Approved);
        assert_eq!(req.currency.as_deref(), Some("INR"));
        assert_eq!(req.quoted_price, Some(12.5));
        assert_eq!(req.meta.last_actor, "admin");

        let req = f.svc.request_payment(&a, id, NoteInput::default()).unwrap();
        assert_eq!(req.status, BrandRequestStatus::RequestedPayment);

        let req = f
            .svc
            .mark_paid(&a, id, MarkPaidInput { payment_reference: Some("UTR-1".into()), note: None })
            .unwrap();
        assert_eq!(req.status, BrandRequestStatus::Paid);
        assert_eq!(req.payment_reference.as_deref(), Some("UTR-1"));

        let steps: Vec<_> = req.meta.history.iter().map(|h| (h.from.as_str(), h.to.as_str())).collect();
        assert_eq!(
            steps,
            vec![
                ("PENDING", "APPROVED"),
                ("APPROVED", "REQUESTED_PAYMENT"),
                ("REQUESTED_PAYMENT", "PAID"),
            ]
        );
        assert!(req.meta.history.iter().all(|h| h.by == "admin"));
    }

    #[test]
    fn approve_requires_positive_price_and_admin() {
        let f = fixture();
        let c = customer("c1");
        let req = create(&f, &c);

        let err = f.svc.approve_brand_request(&admin(), &req.meta.id, approve(0.0)).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let err = f.svc.approve_brand_request(&c, &req.meta.id, approve(5.0)).unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
    }

    #[test]
    fn illegal_transitions() {
        let f = fixture();
        let a = admin();
        let req = create(&f, &customer("c1"));
        let id = req.meta.id.as_str();

        let err = f.svc.mark_paid(&a, id, MarkPaidInput::default()).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));

        f.svc
            .reject_brand_request(&a, id, ReasonInput { reason: "molecule restricted".into() })
            .unwrap();
        let err = f.svc.approve_brand_request(&a, id, approve(1.0)).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(ref m) if m.contains("REJECTED and closed")));

        let open = create(&f, &customer("c1"));
        let err = f.svc.mark_paid(&a, &open.meta.id, MarkPaidInput::default()).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(ref m) if !m.contains("closed")));
    }

    #[test]
    fn reject_requires_reason() {
        let f = fixture();
        let req = create(&f, &customer("c1"));
        let err = f
            .svc
            .reject_brand_request(&admin(), &req.meta.id, ReasonInput { reason: " ".into() })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    #[test]
    fn edit_only_while_pending_and_by_owner() {
        let f = fixture();
        let c = customer("c1");
        let req = create(&f, &c);
        let id = req.meta.id.as_str();

        let patch = UpdateBrandRequest { quantity: Some(20_000), ..Default::default() };
        let req = f.svc.update_brand_request(&c, id, patch).unwrap();
        assert_eq!(req.quantity, 20_000);
        assert!(req.meta.history.is_empty());

        let err = f
            .svc
            .update_brand_request(&admin(), id, UpdateBrandRequest::default())
            .unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));

        f.svc.approve_brand_request(&admin(), id, approve(3.0)).unwrap();
        let err = f.svc.update_brand_request(&c, id, UpdateBrandRequest::default()).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
        let err = f.svc.delete_brand_request(&c, id).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }

    #[test]
    fn other_customers_see_not_found() {
        let f = fixture();
        let req = create(&f, &customer("c1"));
        let err = f.svc.get_brand_request(&customer("c2"), &req.meta.id).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        let err = f.svc.delete_brand_request(&customer("c2"), &req.meta.id).unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[test]
    fn delete_pending() {
        let f = fixture();
        let c = customer("c1");
        let req = create(&f, &c);
        f.svc.delete_brand_request(&c, &req.meta.id).unwrap();
        assert!(matches!(
            f.svc.get_brand_request(&c, &req.meta.id),
            Err(ServiceError::NotFound(_))
        ));
    }

    #[test]
    fn list_scopes_and_filters() {
        let f = fixture();
        let a = admin();
        let c1 = customer("c1");
        let first = create(&f, &c1);
        create(&f, &c1);
        create(&f, &customer("c2"));
        create(&f, &fishman_customer("c3"));
        f.svc.approve_brand_request(&a, &first.meta.id, approve(2.0)).unwrap();

        let mine = f.svc.list_brand_requests(&c1, &RecordFilter::default(), &ListParams::default()).unwrap();
        assert_eq!(mine.total, 2);
        // Most recently updated first.
        assert_eq!(mine.items[0].meta.id, first.meta.id);

        let all = f.svc.list_brand_requests(&a, &RecordFilter::default(), &ListParams::default()).unwrap();
        assert_eq!(all.total, 4);

        let approved = RecordFilter { status: Some("approved".into()), ..Default::default() };
        assert_eq!(f.svc.list_brand_requests(&a, &approved, &ListParams::default()).unwrap().total, 1);

        let fishman = RecordFilter { source: Some(brandhub_core::Source::Fishman), ..Default::default() };
        assert_eq!(f.svc.list_brand_requests(&a, &fishman, &ListParams::default()).unwrap().total, 1);

        // Customers cannot widen their scope with ownerId.
        let other = RecordFilter { owner_id: Some("c2".into()), ..Default::default() };
        assert_eq!(f.svc.list_brand_requests(&c1, &other, &ListParams::default()).unwrap().total, 2);
        assert_eq!(f.svc.list_brand_requests(&a, &other, &ListParams::default()).unwrap().total, 1);

        let search = ListParams { q: Some("PARACET".into()), ..Default::default() };
        assert_eq!(f.svc.list_brand_requests(&a, &RecordFilter::default(), &search).unwrap().total, 4);
    }
}
