//! Bootstrap: first-start checks and admin account creation.
//!
//! When brandhubd starts:
//! 1. Verify the config carries a JWT secret, a data dir and a usable admin
//!    password hash. Refuse to start otherwise.
//! 2. Ensure the configured admin account exists.

use auth::service::AuthService;
use auth::service::password::is_valid_hash;
use tracing::info;

use crate::config::ServerConfig;

/// Verify server configuration is ready for use.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.jwt.secret.trim().is_empty() {
        anyhow::bail!("JWT secret is empty in configuration.");
    }
    if config.storage.data_dir.trim().is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    if config.admin.email.trim().is_empty() {
        anyhow::bail!("Admin email is empty in configuration.");
    }
    if !is_valid_hash(&config.admin.password_hash) {
        anyhow::bail!(
            "No valid admin password hash found in configuration.\n\
             Run `brandhubd hash-password <password>` and put the output in [admin] password_hash."
        );
    }
    if config.jwt.access_ttl_secs <= 0 || config.jwt.refresh_ttl_secs <= 0 {
        anyhow::bail!("JWT token lifetimes must be positive.");
    }
    if config.upload.max_bytes == 0 {
        anyhow::bail!("Upload max_bytes must be positive.");
    }
    Ok(())
}

/// Ensure the admin account from config exists and uses the configured hash.
pub fn ensure_admin(auth: &AuthService, config: &ServerConfig) -> anyhow::Result<()> {
    let admin = auth
        .ensure_admin(&config.admin.email, &config.admin.name, &config.admin.password_hash)
        .map_err(|e| anyhow::anyhow!("failed to bootstrap admin account: {}", e))?;
    info!(user = %admin.id, email = %admin.email, "admin account ready");
    Ok(())
}
