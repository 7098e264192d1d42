//! Server configuration, loaded from a TOML file.
//!
//! ```toml
//! [server]
//! listen = "0.0.0.0:8080"
//!
//! [storage]
//! data_dir = "/var/lib/brandhub"
//!
//! [jwt]
//! secret = "..."
//! access_ttl_secs = 86400
//! refresh_ttl_secs = 604800
//!
//! [admin]
//! email = "ops@example.com"
//! name = "Operations"
//! password_hash = "$argon2id$..."   # brandhubd hash-password <password>
//!
//! [upload]
//! max_bytes = 10485760
//!
//! [[brands]]
//! source = "fishman"
//! displayName = "Fishman Pharma"
//! primaryColor = "#1D4ED8"
//! logo = "/assets/fishman-logo.svg"
//! navigation = ["dashboard", "brand_requests", "packing_designs", "orders"]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use portal::model::BrandProfile;
use portal::service::DEFAULT_MAX_UPLOAD_BYTES;

/// Directory holding named configs (`brandhubd -c prod`).
pub const CONFIG_DIR: &str = "/etc/brandhub";

pub const DEFAULT_LISTEN: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub server: ServerSection,
    pub storage: StorageConfig,
    pub jwt: JwtConfig,
    pub admin: AdminConfig,
    #[serde(default)]
    pub upload: UploadConfig,
    /// Brand profile overrides.
    #[serde(default)]
    pub brands: Vec<BrandProfile>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub listen: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_access_ttl")]
    pub access_ttl_secs: i64,
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_secs: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdminConfig {
    pub email: String,
    #[serde(default = "default_admin_name")]
    pub name: String,
    /// argon2 PHC string.
    pub password_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self { max_bytes: default_max_bytes() }
    }
}

fn default_access_ttl() -> i64 {
    86400
}

fn default_refresh_ttl() -> i64 {
    604800
}

fn default_admin_name() -> String {
    "Administrator".to_string()
}

fn default_max_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}

impl ServerConfig {
    /// A bare name resolves to `/etc/brandhub/<name>.toml`; anything with a
    /// `/` or `.` is used as a path.
    pub fn resolve_path(name_or_path: &str) -> PathBuf {
        if name_or_path.contains('/') || name_or_path.contains('.') {
            PathBuf::from(name_or_path)
        } else {
            Path::new(CONFIG_DIR).join(format!("{}.toml", name_or_path))
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {}", path.display(), e))?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// `--listen` wins over `[server] listen`, which wins over the default.
    pub fn listen_addr(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.server.listen.clone())
            .unwrap_or_else(|| DEFAULT_LISTEN.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [storage]
        data_dir = "/tmp/brandhub"

        [jwt]
        secret = "s3cret"

        [admin]
        email = "ops@example.com"
        password_hash = "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA"
    "#;

    #[test]
    fn minimal_config_uses_defaults() {
        let cfg = ServerConfig::parse(MINIMAL).unwrap();
        assert_eq!(cfg.jwt.access_ttl_secs, 86400);
        assert_eq!(cfg.jwt.refresh_ttl_secs, 604800);
        assert_eq!(cfg.admin.name, "Administrator");
        assert_eq!(cfg.upload.max_bytes, 10 * 1024 * 1024);
        assert!(cfg.brands.is_empty());
        assert_eq!(cfg.listen_addr(None), DEFAULT_LISTEN);
        assert_eq!(cfg.listen_addr(Some("127.0.0.1:9000")), "127.0.0.1:9000");
    }

    #[test]
    fn full_config() {
        let content = format!(
            r##"{}
            [server]
            listen = "127.0.0.1:7000"

            [upload]
            max_bytes = 1024

            [[brands]]
            source = "fishman"
            displayName = "Fishman"
            primaryColor = "#111111"
            logo = "/f.svg"
            navigation = ["dashboard", "orders"]
            "##,
            MINIMAL
        );
        let cfg = ServerConfig::parse(&content).unwrap();
        assert_eq!(cfg.listen_addr(None), "127.0.0.1:7000");
        assert_eq!(cfg.upload.max_bytes, 1024);
        assert_eq!(cfg.brands[0].navigation, vec!["dashboard", "orders"]);
    }

    #[test]
    fn missing_section_is_an_error() {
        assert!(ServerConfig::parse("[storage]\ndata_dir = \"/tmp\"").is_err());
    }

    #[test]
    fn resolve_names_and_paths() {
        assert_eq!(ServerConfig::resolve_path("prod"), PathBuf::from("/etc/brandhub/prod.toml"));
        assert_eq!(ServerConfig::resolve_path("./local.toml"), PathBuf::from("./local.toml"));
    }
}
