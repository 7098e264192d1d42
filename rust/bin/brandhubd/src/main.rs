//! `brandhubd`: the brand portal server binary.
//!
//! Usage:
//!   brandhubd -c <context-name-or-path> [--listen <addr>]
//!   brandhubd hash-password <password>
//!
//! The context name resolves to `/etc/brandhub/<name>.toml`.
//! If a path with `/` or `.` is given, it's used directly.

mod auth_middleware;
mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use brandhub_core::Module;
use config::ServerConfig;

/// Brand portal server.
#[derive(Parser, Debug)]
#[command(name = "brandhubd", about = "Brand portal server", subcommand_negates_reqs = true)]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config", required = true)]
    config: Option<String>,

    /// Listen address (overrides [server] listen, default 0.0.0.0:8080).
    #[arg(long = "listen")]
    listen: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print an argon2id hash for the [admin] password_hash setting.
    HashPassword {
        password: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    if let Some(Command::HashPassword { password }) = &cli.command {
        let hash = auth::service::password::hash_password(password)
            .map_err(|e| anyhow::anyhow!("{}", e))?;
        println!("{}", hash);
        return Ok(());
    }

    let config_name = cli
        .config
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--config is required"))?;

    // Load server configuration.
    let config_path = ServerConfig::resolve_path(config_name);
    info!("Loading configuration from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;

    // Verify configuration is valid.
    bootstrap::verify_config(&server_config)?;
    let listen = server_config.listen_addr(cli.listen.as_deref());

    // Initialize storage.
    let data_dir = std::path::PathBuf::from(&server_config.storage.data_dir);
    std::fs::create_dir_all(&data_dir)?;

    let core_config = brandhub_core::ServiceConfig {
        data_dir: Some(data_dir.clone()),
        listen: listen.clone(),
        ..Default::default()
    };

    // Embedded stores, shared by all modules.
    let sql: Arc<dyn brandhub_sql::SQLStore> = Arc::new(
        brandhub_sql::SqliteStore::open(&core_config.resolve_sqlite_path())
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    let kv: Arc<dyn brandhub_kv::KVStore> = Arc::new(
        brandhub_kv::RedbStore::open(&core_config.resolve_db_path())
            .map_err(|e| anyhow::anyhow!("failed to open KV store: {}", e))?,
    );
    let blob: Arc<dyn brandhub_blob::BlobStore> = Arc::new(
        brandhub_blob::FileStore::open(&core_config.resolve_blob_dir())
            .map_err(|e| anyhow::anyhow!("failed to open blob store: {}", e))?,
    );

    // ── Modules ──

    let auth_config = auth::service::AuthConfig {
        jwt_secret: server_config.jwt.secret.clone(),
        access_token_ttl: server_config.jwt.access_ttl_secs,
        refresh_token_ttl: server_config.jwt.refresh_ttl_secs,
        ..Default::default()
    };
    let auth_module = auth::AuthModule::new(Arc::clone(&sql), auth_config)?;
    info!("Auth module initialized");

    // Bootstrap: ensure the admin account exists.
    bootstrap::ensure_admin(auth_module.service(), &server_config)?;

    let portal_config = portal::service::PortalConfig {
        max_upload_bytes: server_config.upload.max_bytes,
        brands: server_config.brands.clone(),
    };
    let portal_module = portal::PortalModule::new(
        Arc::clone(&sql),
        Arc::clone(&kv),
        Arc::clone(&blob),
        portal_config,
    )?;
    info!("Portal module initialized");

    let module_routes = vec![
        (auth_module.name(), auth_module.routes()),
        (portal_module.name(), portal_module.routes()),
    ];

    // Build router.
    let app = routes::build_router(
        auth_module.service().clone(),
        module_routes,
        server_config.upload.max_bytes,
    );

    // Start server.
    let listener = tokio::net::TcpListener::bind(&listen).await?;
    info!("brandhubd listening on {}", listen);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("brandhubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Command};

    #[test]
    fn parse_server_args() {
        let cli = Cli::try_parse_from(["brandhubd", "-c", "prod", "--listen", "127.0.0.1:9000"]).unwrap();
        assert_eq!(cli.config.as_deref(), Some("prod"));
        assert_eq!(cli.listen.as_deref(), Some("127.0.0.1:9000"));
        assert!(cli.command.is_none());
    }

    #[test]
    fn parse_hash_password() {
        let cli = Cli::try_parse_from(["brandhubd", "hash-password", "s3cret"]).unwrap();
        assert!(matches!(cli.command, Some(Command::HashPassword { ref password }) if password == "s3cret"));
    }

    #[test]
    fn config_required_without_subcommand() {
        assert!(Cli::try_parse_from(["brandhubd"]).is_err());
    }
}
