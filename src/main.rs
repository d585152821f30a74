//! Service entry-point: configuration, pool construction, and server start.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use clap::Parser;
use reqwest::Url;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use boltning::outbound::generation::DEFAULT_ENDPOINT;
use boltning::outbound::persistence::{DbPool, PoolConfig};
use boltning::server::{create_server, ServerConfig};

#[derive(Debug, Parser)]
#[command(name = "boltning", about = "Project versioning and deployment publishing service")]
struct Cli {
    /// Socket address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0:8080")]
    bind_addr: SocketAddr,

    /// Path to the SQLite database file.
    #[arg(long, env = "DATABASE_PATH", default_value = "boltning.db")]
    database_path: PathBuf,

    /// Upstream text-generation endpoint.
    #[arg(long, env = "GENERATION_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    generation_endpoint: Url,

    /// Upstream request deadline, in seconds.
    #[arg(long, env = "GENERATION_TIMEOUT_SECS", default_value_t = 60)]
    generation_timeout_secs: u64,

    /// File holding the session signing key material.
    #[arg(long, env = "SESSION_KEY_FILE", default_value = "/var/run/secrets/session_key")]
    session_key_file: PathBuf,

    /// Mark session cookies Secure. Disable only behind plain HTTP in dev.
    #[arg(
        long,
        env = "SESSION_COOKIE_SECURE",
        default_value_t = true,
        action = clap::ArgAction::Set
    )]
    cookie_secure: bool,

    /// Permit an ephemeral session key when the key file is unreadable.
    /// Sessions will not survive a restart.
    #[arg(long, env = "SESSION_ALLOW_EPHEMERAL", default_value_t = false)]
    allow_ephemeral_key: bool,
}

fn load_session_key(cli: &Cli) -> std::io::Result<Key> {
    match std::fs::read(&cli.session_key_file) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) => {
            if cfg!(debug_assertions) || cli.allow_ephemeral_key {
                warn!(
                    path = %cli.session_key_file.display(),
                    error = %e,
                    "using temporary session key (dev only)"
                );
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {e}",
                    cli.session_key_file.display()
                )))
            }
        }
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let key = load_session_key(&cli)?;

    let pool = DbPool::new(PoolConfig::new(cli.database_path.to_string_lossy()))
        .map_err(|error| std::io::Error::other(format!("database pool failed: {error}")))?;

    let config = ServerConfig::new(
        key,
        cli.cookie_secure,
        SameSite::Lax,
        cli.bind_addr,
        pool,
        cli.generation_endpoint.clone(),
    )
    .with_generation_timeout(Duration::from_secs(cli.generation_timeout_secs));

    info!(
        bind_addr = %cli.bind_addr,
        database = %cli.database_path.display(),
        generation_endpoint = %cli.generation_endpoint,
        "starting server"
    );
    create_server(config)?.await
}
