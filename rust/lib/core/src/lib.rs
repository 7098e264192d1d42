pub mod auth;
pub mod config;
pub mod error;
pub mod module;
pub mod source;
pub mod types;

pub use auth::{Claims, Role, TokenKind};
pub use config::ServiceConfig;
pub use error::{ErrorBody, ServiceError};
pub use module::Module;
pub use source::Source;
pub use types::{ListParams, ListResult, MAX_LIMIT, new_id, now_rfc3339};
