use serde::{Deserialize, Serialize};

use brandhub_core::Source;

/// How a portal presents itself for one brand context.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BrandProfile {
    pub source: Source,
    pub display_name: String,
    /// CSS colour, e.g. `#0F766E`.
    pub primary_color: String,
    /// Logo URL or asset path.
    pub logo: String,
    /// Sections shown in the portal navigation, in order.
    pub navigation: Vec<String>,
}

impl BrandProfile {
    /// Built-in profile for a source.
    pub fn builtin(source: Source) -> Self {
        match source {
            Source::Veerix => Self {
                source,
                display_name: "Veerix Healthcare".into(),
                primary_color: "#0F766E".into(),
                logo: "/assets/veerix-logo.svg".into(),
                navigation: nav(&["dashboard", "brand_requests", "trademarks", "packing_designs", "orders"]),
            },
            Source::Fishman => Self {
                source,
                display_name: "Fishman Pharma".into(),
                primary_color: "#1D4ED8".into(),
                logo: "/assets/fishman-logo.svg".into(),
                navigation: nav(&["dashboard", "brand_requests", "packing_designs", "orders"]),
            },
        }
    }
}

fn nav(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
