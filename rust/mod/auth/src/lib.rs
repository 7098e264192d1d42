//! Auth module: customer and staff accounts, password login, JWT sessions.
//!
//! # Resources
//!
//! - **User**: customer (self-registered) or admin (bootstrapped from config)
//! - **Session**: one per login; access and refresh tokens carry its id
//!
//! # Usage
//!
//! ```ignore
//! use auth::{AuthModule, service::AuthConfig};
//!
//! let module = AuthModule::new(sql, AuthConfig::default())?;
//! let router = module.routes(); // Mount under /auth
//! ```

pub mod api;
pub mod model;
pub mod service;

use std::sync::Arc;

use axum::Router;

use brandhub_core::{Module, ServiceError};
use brandhub_sql::SQLStore;

use crate::service::{AuthConfig, AuthService};

/// Auth module implementing the Module trait.
pub struct AuthModule {
    service: Arc<AuthService>,
}

impl AuthModule {
    pub fn new(sql: Arc<dyn SQLStore>, config: AuthConfig) -> Result<Self, ServiceError> {
        let service = AuthService::new(sql, config)?;
        Ok(Self { service })
    }

    /// The underlying service, shared with the token middleware.
    pub fn service(&self) -> &Arc<AuthService> {
        &self.service
    }
}

impl Module for AuthModule {
    fn name(&self) -> &str {
        "auth"
    }

    fn routes(&self) -> Router {
        api::build_router(self.service.clone())
    }
}
