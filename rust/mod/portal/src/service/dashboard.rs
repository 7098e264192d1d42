use brandhub_core::{Claims, ServiceError, Source};

use crate::model::*;
use super::{PortalService, Tracked, Where, sql_err};

/// Length of the recent-activity feed.
pub const RECENT_LIMIT: usize = 10;

impl PortalService {
    /// Per-collection status counts and the latest activity, scoped to what
    /// the caller may see.
    pub fn dashboard(&self, claims: &Claims, source: Option<Source>) -> Result<DashboardSummary, ServiceError> {
        let mut summary = DashboardSummary::default();
        summary.collections.insert(
            Section::BrandRequests,
            self.collection_summary::<BrandRequest>(claims, source)?,
        );
        summary.collections.insert(
            Section::Trademarks,
            self.collection_summary::<TrademarkSuggestion>(claims, source)?,
        );
        summary.collections.insert(
            Section::PackingDesigns,
            self.collection_summary::<PackingDesign>(claims, source)?,
        );
        summary
            .collections
            .insert(Section::Orders, self.collection_summary::<Order>(claims, source)?);
        summary.recent = self.recent(claims, source)?;
        Ok(summary)
    }

    fn collection_summary<T: Tracked>(
        &self,
        claims: &Claims,
        source: Option<Source>,
    ) -> Result<CollectionSummary, ServiceError> {
        let w = Where::scoped(claims, source);
        let sql = format!(
            "SELECT status, COUNT(*) AS cnt FROM {}{} GROUP BY status ORDER BY status",
            T::SECTION.as_str(),
            w.sql()
        );
        let mut out = CollectionSummary::default();
        for row in self.sql.query(&sql, &w.args).map_err(sql_err)? {
            let status = row.get_str("status").unwrap_or_default().to_string();
            let count = row.get_i64("cnt").unwrap_or(0) as usize;
            out.total += count;
            out.by_status.push(StatusCount {
                label: T::status_label(&status),
                status,
                count,
            });
        }
        Ok(out)
    }

    fn recent(&self, claims: &Claims, source: Option<Source>) -> Result<Vec<RecentItem>, ServiceError> {
        // Placeholders are numbered, so every branch of the union reuses the
        // same arguments.
        let w = Where::scoped(claims, source);
        let where_sql = w.sql();
        let branches: Vec<String> = Section::ALL
            .iter()
            .map(|s| {
                format!(
                    "SELECT '{}' AS section, id, title, status, update_at FROM {}{}",
                    s.as_str(),
                    s.as_str(),
                    where_sql
                )
            })
            .collect();
        let sql = format!(
            "{} ORDER BY update_at DESC LIMIT {}",
            branches.join(" UNION ALL "),
            RECENT_LIMIT
        );

        let mut items = Vec::new();
        for row in self.sql.query(&sql, &w.args).map_err(sql_err)? {
            let section: Section = row.get_str("section").unwrap_or_default().parse()?;
            items.push(RecentItem {
                kind: section.kind(),
                id: row.get_str("id").unwrap_or_default().to_string(),
                title: row.get_str("title").unwrap_or_default().to_string(),
                status: row.get_str("status").unwrap_or_default().to_string(),
                updated_at: row.get_str("update_at").unwrap_or_default().to_string(),
            });
        }
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::testing::*;

    fn seed(f: &Fixture, claims: &Claims) {
        f.svc
            .create_brand_request(
                claims,
                CreateBrandRequest {
                    molecule: "Metformin".into(),
                    dosage_form: None,
                    strength: Some("500 mg".into()),
                    quantity: 10,
                    notes: None,
                },
            )
            .unwrap();
        f.svc
            .create_trademark(claims, CreateTrademark { names: vec!["Glucova".into()], product_category: None, notes: None })
            .unwrap();
        f.svc
            .place_order(
                claims,
                PlaceOrder {
                    product_name: "Glucova 500".into(),
                    brand_request_id: None,
                    quantity: 10,
                    delivery_address: "Plot 4, Baddi".into(),
                    notes: None,
                },
            )
            .unwrap();
    }

    #[test]
    fn counts_are_scoped() {
        let f = fixture();
        seed(&f, &customer("c1"));
        seed(&f, &fishman_customer("c2"));

        let mine = f.svc.dashboard(&customer("c1"), None).unwrap();
        let br = &mine.collections[&Section::BrandRequests];
        assert_eq!(br.total, 1);
        assert_eq!(br.by_status[0].status, "PENDING");
        assert_eq!(br.by_status[0].label, "Pending");
        assert_eq!(mine.collections[&Section::PackingDesigns].total, 0);
        assert_eq!(mine.recent.len(), 3);

        let all = f.svc.dashboard(&admin(), None).unwrap();
        assert_eq!(all.collections[&Section::Orders].total, 2);
        assert_eq!(all.collections[&Section::Orders].by_status[0].label, "Order Placed");

        let fishman = f.svc.dashboard(&admin(), Some(Source::Fishman)).unwrap();
        assert_eq!(fishman.collections[&Section::Trademarks].total, 1);
    }

    #[test]
    fn recent_is_newest_first_and_capped() {
        let f = fixture();
        let c = customer("c1");
        for _ in 0..4 {
            seed(&f, &c);
        }
        let d = f.svc.dashboard(&c, None).unwrap();
        assert_eq!(d.recent.len(), RECENT_LIMIT);
        assert!(d.recent.windows(2).all(|w| w[0].updated_at >= w[1].updated_at));
        assert_eq!(d.recent[0].kind, "order");
        assert_eq!(d.recent[0].title, "Glucova 500 x 10");
    }
}
