//! Portal module: the customer-facing workflows of the brand portals.
//!
//! # Resources
//!
//! - **BrandRequest**: quote request for a molecule, priced and paid
//! - **TrademarkSuggestion**: candidate brand names through registration
//! - **PackingDesign**: artwork files through review, approval and print
//! - **Order**: manufacturing order tracked to delivery
//!
//! Plus unseen-change badges, a dashboard summary and the public brand
//! profiles.
//!
//! # Usage
//!
//! ```ignore
//! use portal::{PortalModule, service::PortalConfig};
//!
//! let module = PortalModule::new(sql, kv, blob, PortalConfig::default())?;
//! let router = module.routes(); // Mount under /portal
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use brandhub_blob::BlobStore;
use brandhub_core::{Module, ServiceError};
use brandhub_kv::KVStore;
use brandhub_sql::SQLStore;

use crate::service::{PortalConfig, PortalService};

/// Portal module implementing the Module trait.
pub struct PortalModule {
    service: Arc<PortalService>,
}

impl PortalModule {
    pub fn new(
        sql: Arc<dyn SQLStore>,
        kv: Arc<dyn KVStore>,
        blob: Arc<dyn BlobStore>,
        config: PortalConfig,
    ) -> Result<Self, ServiceError> {
        let service = PortalService::new(sql, kv, blob, config)?;
        Ok(Self { service })
    }

    pub fn service(&self) -> &Arc<PortalService> {
        &self.service
    }
}

impl Module for PortalModule {
    fn name(&self) -> &str {
        "portal"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
