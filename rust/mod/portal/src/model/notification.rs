use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use brandhub_core::ServiceError;

/// A portal collection. Doubles as the notification section name and the
/// SQL table name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    BrandRequests,
    Trademarks,
    PackingDesigns,
    Orders,
}

impl Section {
    pub const ALL: [Section; 4] = [
        Self::BrandRequests,
        Self::Trademarks,
        Self::PackingDesigns,
        Self::Orders,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BrandRequests => "brand_requests",
            Self::Trademarks => "trademarks",
            Self::PackingDesigns => "packing_designs",
            Self::Orders => "orders",
        }
    }

    /// Singular kind used in dashboard feeds.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::BrandRequests => "brand_request",
            Self::Trademarks => "trademark",
            Self::PackingDesigns => "packing_design",
            Self::Orders => "order",
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Section {
    type Err = ServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|sec| sec.as_str() == s)
            .ok_or_else(|| ServiceError::Validation(format!("unknown section: {}", s)))
    }
}

/// Unseen-change counts per section.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct Badges {
    pub sections: BTreeMap<Section, usize>,
    pub total: usize,
}
