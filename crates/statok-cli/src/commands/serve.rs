//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use statok_core::AnalyticsConfig;

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    no_encrypt: bool,
    static_dir: Option<&Path>,
    analytics: AnalyticsConfig,
) -> Result<()> {
    println!("🚀 Starting Statok web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = statok_server::ServerConfig::from_env(analytics);

    println!(
        "   🔒 Authentication: session tokens ({}h lifetime)",
        config.session_ttl_hours
    );
    if !config.allowed_origins.is_empty() {
        println!(
            "   🌐 Allowed origins: {} (STATOK_ALLOWED_ORIGINS)",
            config.allowed_origins.join(", ")
        );
    }
    if no_encrypt {
        println!("   ⚠️  Encryption DISABLED (--no-encrypt)");
    }
    println!();
    println!("   Press Ctrl+C to stop");

    let db = open_db(db_path, no_encrypt)?;

    let static_dir_str = static_dir
        .map(|p| p.to_str().context("static_dir path must be valid UTF-8"))
        .transpose()?;
    statok_server::serve_with_config(db, host, port, static_dir_str, config).await?;

    Ok(())
}
