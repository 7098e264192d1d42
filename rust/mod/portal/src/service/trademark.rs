use std::collections::HashSet;

use tracing::{info, warn};

use brandhub_core::{Claims, ListParams, ListResult, ServiceError};

use crate::model::*;
use super::{PortalService, RecordFilter, Tracked, optional, require_owner, required};

/// Most names a single suggestion may carry.
pub const MAX_NAMES: usize = 5;

impl Tracked for TrademarkSuggestion {
    const SECTION: Section = Section::Trademarks;

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn status_code(&self) -> &'static str {
        self.tracking_status.as_str()
    }

    fn title(&self) -> String {
        self.selected_name
            .clone()
            .unwrap_or_else(|| self.names.join(" / "))
    }

    fn status_label(code: &str) -> &'static str {
        TrackingStatus::PIPELINE
            .into_iter()
            .chain([TrackingStatus::Refused])
            .find(|s| s.as_str() == code)
            .map(|s| s.label())
            .unwrap_or("Unknown")
    }
}

/// Trim each name and require 1..=5 non-blank, case-insensitively distinct names.
fn normalize_names(names: Vec<String>) -> Result<Vec<String>, ServiceError> {
    let names: Vec<String> = names.into_iter().map(|n| n.trim().to_string()).collect();
    if names.is_empty() || names.len() > MAX_NAMES {
        return Err(ServiceError::Validation(format!(
            "between 1 and {} names are required",
            MAX_NAMES
        )));
    }
    if names.iter().any(|n| n.is_empty()) {
        return Err(ServiceError::Validation("names must not be blank".into()));
    }
    let mut seen = HashSet::new();
    for n in &names {
        if !seen.insert(n.to_lowercase()) {
            return Err(ServiceError::Validation(format!("duplicate name: {}", n)));
        }
    }
    Ok(names)
}

/// Unicode case-insensitive name comparison.
fn same_name(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn only_while_submitted(tm: &TrademarkSuggestion, action: &str) -> Result<(), ServiceError> {
    if tm.tracking_status != TrackingStatus::Submitted {
        return Err(ServiceError::InvalidTransition(format!(
            "trademark is {}, only SUBMITTED suggestions can be {}",
            tm.tracking_status, action
        )));
    }
    Ok(())
}

impl PortalService {
    pub fn create_trademark(
        &self,
        claims: &Claims,
        input: CreateTrademark,
    ) -> Result<TrademarkSuggestion, ServiceError> {
        let tm = TrademarkSuggestion {
            meta: Self::new_meta(claims),
            names: normalize_names(input.names)?,
            product_category: optional(input.product_category),
            notes: optional(input.notes),
            selected_name: None,
            application_number: None,
            registration_number: None,
            tracking_status: TrackingStatus::Submitted,
            rejection_reason: None,
        };
        self.insert(&tm)?;
        info!(id = %tm.meta.id, owner = %tm.meta.owner_id, names = tm.names.len(), "trademark names submitted");
        Ok(tm)
    }

    pub fn get_trademark(&self, claims: &Claims, id: &str) -> Result<TrademarkSuggestion, ServiceError> {
        self.load(claims, id)
    }

    pub fn list_trademarks(
        &self,
        claims: &Claims,
        filter: &RecordFilter,
        params: &ListParams,
    ) -> Result<ListResult<TrademarkSuggestion>, ServiceError> {
        self.list(claims, filter, params)
    }

    pub fn update_trademark(
        &self,
        claims: &Claims,
        id: &str,
        patch: UpdateTrademark,
    ) -> Result<TrademarkSuggestion, ServiceError> {
        self.mutate(claims, id, |tm: &mut TrademarkSuggestion| {
            require_owner(claims, &tm.meta, "edit a trademark suggestion")?;
            only_while_submitted(tm, "edited")?;
            if let Some(names) = patch.names {
                tm.names = normalize_names(names)?;
            }
            if patch.product_category.is_some() {
                tm.product_category = optional(patch.product_category);
            }
            if patch.notes.is_some() {
                tm.notes = optional(patch.notes);
            }
            Ok(None)
        })
    }

    pub fn delete_trademark(&self, claims: &Claims, id: &str) -> Result<(), ServiceError> {
        let tm: TrademarkSuggestion = self.load(claims, id)?;
        only_while_submitted(&tm, "deleted")?;
        self.remove(Section::Trademarks, id, &tm.meta.updated_at)
    }

    /// Move to the next registration stage. Some stages require data on
    /// entry: the selected name, the application number, the registration
    /// number.
    pub fn advance_trademark(
        &self,
        claims: &Claims,
        id: &str,
        input: AdvanceTrademark,
    ) -> Result<TrademarkSuggestion, ServiceError> {
        claims.require_admin()?;
        let tm = self.mutate(claims, id, |tm: &mut TrademarkSuggestion| {
            let Some(next) = tm.tracking_status.next() else {
                warn!(id = %tm.meta.id, status = %tm.tracking_status, "trademark advance rejected");
                return Err(ServiceError::InvalidTransition(format!(
                    "trademark is {}, no further stage",
                    tm.tracking_status
                )));
            };
            match next {
                TrackingStatus::NameSelected => {
                    let name = input
                        .selected_name
                        .as_deref()
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .ok_or_else(|| ServiceError::Validation("selectedName is required".into()))?;
                    let chosen = tm
                        .names
                        .iter()
                        .find(|n| same_name(n, name))
                        .cloned()
                        .ok_or_else(|| {
                            ServiceError::Validation(format!("{} is not one of the suggested names", name))
                        })?;
                    tm.selected_name = Some(chosen);
                }
                TrackingStatus::ApplicationFiled => {
                    tm.application_number = Some(required(
                        "applicationNumber",
                        input.application_number.as_deref().unwrap_or_default(),
                    )?);
                }
                TrackingStatus::Registered => {
                    tm.registration_number = Some(required(
                        "registrationNumber",
                        input.registration_number.as_deref().unwrap_or_default(),
                    )?);
                }
                _ => {}
            }
            tm.tracking_status = next;
            Ok(optional(input.note))
        })?;
        info!(id, status = %tm.tracking_status, "trademark advanced");
        Ok(tm)
    }

    /// Side exit from any non-terminal stage.
    pub fn refuse_trademark(
        &self,
        claims: &Claims,
        id: &str,
        input: ReasonInput,
    ) -> Result<TrademarkSuggestion, ServiceError> {
        claims.require_admin()?;
        let reason = required("reason", &input.reason)?;
        self.mutate(claims, id, |tm: &mut TrademarkSuggestion| {
            if tm.tracking_status.is_terminal() {
                return Err(ServiceError::InvalidTransition(format!(
                    "trademark is {}, cannot refuse",
                    tm.tracking_status
                )));
            }
            tm.tracking_status = TrackingStatus::Refused;
            tm.rejection_reason = Some(reason.clone());
            Ok(Some(reason))
        })
    }

    /// Every stage in pipeline order, followed by the refusal exit.
    pub fn trademark_stages(&self) -> Vec<StageInfo> {
        TrackingStatus::PIPELINE
            .into_iter()
            .chain([TrackingStatus::Refused])
            .map(|s| StageInfo { code: s.as_str(), label: s.label() })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::*;

    fn create(f: &Fixture, claims: &Claims, names: &[&str]) -> Result<TrademarkSuggestion, ServiceError> {
        f.svc.create_trademark(
            claims,
            CreateTrademark {
                names: names.iter().map(|s| s.to_string()).collect(),
                product_category: Some("Analgesic".into()),
                notes: None,
            },
        )
    }

    fn advance(f: &Fixture, id: &str, input: AdvanceTrademark) -> Result<TrademarkSuggestion, ServiceError> {
        f.svc.advance_trademark(&admin(), id, input)
    }

    #[test]
    fn names_are_validated() {
        let f = fixture();
        let c = customer("c1");
        let tm = create(&f, &c, &[" Paravix ", "Feverin"]).unwrap();
        assert_eq!(tm.names, vec!["Paravix", "Feverin"]);

        for bad in [&[][..], &["a", "b", "c", "d", "e", "f"][..], &["Paravix", "paravix"][..], &["ok", "  "][..]] {
            let err = create(&f, &c, bad).unwrap_err();
            assert!(matches!(err, ServiceError::Validation(_)), "{:?}", bad);
        }
    }

    #[test]
    fn non_ascii_names_fold_case() {
        let f = fixture();
        let c = customer("c1");
        let err = create(&f, &c, &["Ärzol", "ärzol"]).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let tm = create(&f, &c, &["Ärzol", "Çefix"]).unwrap();
        let id = tm.meta.id.as_str();
        advance(&f, id, AdvanceTrademark::default()).unwrap();
        let tm = advance(&f, id, AdvanceTrademark { selected_name: Some("ärzol".into()), ..Default::default() })
            .unwrap();
        assert_eq!(tm.selected_name.as_deref(), Some("Ärzol"));
    }

    #[test]
    fn walks_to_registered() {
        let f = fixture();
        let tm = create(&f, &customer("c1"), &["Paravix", "Feverin"]).unwrap();
        let id = tm.meta.id.as_str();

        let tm = advance(&f, id, AdvanceTrademark::default()).unwrap();
        assert_eq!(tm.tracking_status, TrackingStatus::NameSearch);

        let err = advance(&f, id, AdvanceTrademark::default()).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        let err = advance(&f, id, AdvanceTrademark { selected_name: Some("Other".into()), ..Default::default() })
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));

        let tm = advance(&f, id, AdvanceTrademark { selected_name: Some("feverin".into()), ..Default::default() })
            .unwrap();
        assert_eq!(tm.selected_name.as_deref(), Some("Feverin"));
        assert_eq!(tm.title(), "Feverin");

        let err = advance(&f, id, AdvanceTrademark::default()).unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
        advance(&f, id, AdvanceTrademark { application_number: Some("TM-123".into()), ..Default::default() }).unwrap();
        advance(&f, id, AdvanceTrademark::default()).unwrap();
        let tm = advance(&f, id, AdvanceTrademark::default()).unwrap();
        assert_eq!(tm.tracking_status, TrackingStatus::Published);
        assert_eq!(tm.tracking_status.label(), "Published in Trade Marks Journal");

        let tm = advance(&f, id, AdvanceTrademark { registration_number: Some("R-9".into()), ..Default::default() })
            .unwrap();
        assert_eq!(tm.tracking_status, TrackingStatus::Registered);
        assert_eq!(tm.meta.history.len(), 6);

        let err = advance(&f, id, AdvanceTrademark::default()).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
        let err = f
            .svc
            .refuse_trademark(&admin(), id, ReasonInput { reason: "late".into() })
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }

    #[test]
    fn refuse_from_name_search() {
        let f = fixture();
        let tm = create(&f, &customer("c1"), &["Paravix"]).unwrap();
        let id = tm.meta.id.as_str();
        advance(&f, id, AdvanceTrademark::default()).unwrap();

        let tm = f
            .svc
            .refuse_trademark(&admin(), id, ReasonInput { reason: "conflicting mark".into() })
            .unwrap();
        assert_eq!(tm.tracking_status, TrackingStatus::Refused);
        assert_eq!(tm.rejection_reason.as_deref(), Some("conflicting mark"));
        let last = tm.meta.history.last().unwrap();
        assert_eq!((last.from.as_str(), last.to.as_str()), ("NAME_SEARCH", "REFUSED"));
        assert_eq!(last.note.as_deref(), Some("conflicting mark"));
    }

    #[test]
    fn customers_cannot_advance() {
        let f = fixture();
        let c = customer("c1");
        let tm = create(&f, &c, &["Paravix"]).unwrap();
        let err = f.svc.advance_trademark(&c, &tm.meta.id, AdvanceTrademark::default()).unwrap_err();
        assert!(matches!(err, ServiceError::PermissionDenied(_)));
    }

    #[test]
    fn edit_and_delete_only_while_submitted() {
        let f = fixture();
        let c = customer("c1");
        let tm = create(&f, &c, &["Paravix"]).unwrap();
        let id = tm.meta.id.as_str();

        let tm = f
            .svc
            .update_trademark(&c, id, UpdateTrademark { names: Some(vec!["Paravix".into(), "Calmol".into()]), ..Default::default() })
            .unwrap();
        assert_eq!(tm.names.len(), 2);

        advance(&f, id, AdvanceTrademark::default()).unwrap();
        let err = f.svc.update_trademark(&c, id, UpdateTrademark::default()).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
        let err = f.svc.delete_trademark(&c, id).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidTransition(_)));
    }

    #[test]
    fn stages_listing() {
        let f = fixture();
        let stages = f.svc.trademark_stages();
        assert_eq!(stages.len(), 8);
        assert_eq!(stages[0].code, "SUBMITTED");
        assert_eq!(stages[7].code, "REFUSED");
    }
}
