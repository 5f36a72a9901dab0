//! Nexus console - terminal dashboard over the NEXUS telemetry API
//!
//! Boot sequence:
//! - restore any persisted session from the key store
//! - prompt for sign-in when the route guard would redirect
//! - poll the stats endpoint and render snapshots until interrupted

mod config;
mod dashboard;
mod prompt;
mod render;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::info;

use config::ConsoleConfig;
use dashboard::Dashboard;
use nexus_core::services::{HttpCredentialService, HttpProfileService, HttpStatsService};
use nexus_core::session::SessionManager;
use nexus_core::storage::{FileStore, KeyStore};
use nexus_core::telemetry::TelemetryFeed;
use prompt::SignInPrompt;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();

    info!("Nexus console starting...");

    let config = ConsoleConfig::load()
        .await
        .context("Failed to load configuration")?;

    let store: Arc<dyn KeyStore> = Arc::new(
        FileStore::open(FileStore::default_path().context("Failed to resolve store path")?)
            .context("Failed to open the key store")?,
    );

    let credentials = Arc::new(HttpCredentialService::new(&config.api_base_url));
    let stats = Arc::new(HttpStatsService::new(&config.api_base_url));
    let profile = Arc::new(HttpProfileService::new(
        &config.api_base_url,
        Arc::clone(&store),
    ));

    let session = SessionManager::new(credentials, Arc::clone(&store));
    session.restore();

    // Same policy as the web dashboard: anything outside the public
    // paths redirects anonymous visitors to sign-in.
    if session.redirect_target("/dashboard").is_some() {
        let signed_in = SignInPrompt::run(&session)
            .await
            .context("Sign-in prompt failed")?;
        if !signed_in {
            println!("Aborted.");
            return Ok(());
        }
    }

    let Some(user) = session.state().user else {
        anyhow::bail!("no session established");
    };
    println!();
    println!("Welcome, {} <{}>", user.username, user.email);
    println!("Commands: t theme / p profile / w password / m memory / o sign out / q quit");
    println!();

    let feed = TelemetryFeed::new(stats);
    let poll_interval = Duration::from_secs(config.poll_interval_secs);

    Dashboard::new(session, feed, profile, store)
        .run(poll_interval)
        .await
        .context("Dashboard loop failed")?;

    info!("Nexus console stopped");
    Ok(())
}
