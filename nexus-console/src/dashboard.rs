//! Dashboard loop: telemetry rendering plus single-key commands
//!
//! Renders one status line per second while the feed polls in the
//! background. Commands read from stdin:
//!   t  toggle theme        p  edit profile
//!   w  change password     m  memory detail
//!   o  log out and exit    q  quit

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;

use nexus_core::services::{ProfileApi, ProfileUpdate};
use nexus_core::session::SessionManager;
use nexus_core::storage::KeyStore;
use nexus_core::telemetry::TelemetryFeed;
use nexus_core::theme::Theme;
use nexus_core::validation::PasswordChange;

use crate::render;

type InputLines = Lines<BufReader<Stdin>>;

pub struct Dashboard {
    session: SessionManager,
    feed: TelemetryFeed,
    profile: Arc<dyn ProfileApi>,
    store: Arc<dyn KeyStore>,
    theme: Theme,
}

impl Dashboard {
    pub fn new(
        session: SessionManager,
        feed: TelemetryFeed,
        profile: Arc<dyn ProfileApi>,
        store: Arc<dyn KeyStore>,
    ) -> Self {
        let theme = Theme::load(store.as_ref());
        Self {
            session,
            feed,
            profile,
            store,
            theme,
        }
    }

    pub async fn run(mut self, poll_interval: Duration) -> Result<()> {
        self.feed.start(poll_interval);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut render_timer = tokio::time::interval(Duration::from_secs(1));

        loop {
            tokio::select! {
                _ = render_timer.tick() => {
                    render::status_line(&self.feed.snapshot(), self.theme);
                }
                line = lines.next_line() => {
                    match line? {
                        Some(command) => {
                            if !self.handle_command(command.trim(), &mut lines).await? {
                                break;
                            }
                        }
                        None => break, // stdin closed
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("interrupt received");
                    break;
                }
            }
        }

        self.feed.stop();
        Ok(())
    }

    /// Returns false when the loop should end
    async fn handle_command(&mut self, command: &str, lines: &mut InputLines) -> Result<bool> {
        match command {
            "" => {}
            "t" => {
                self.theme = self.theme.toggle(self.store.as_ref());
                println!("Theme: {}", self.theme);
            }
            "p" => self.edit_profile(lines).await?,
            "w" => self.change_password(lines).await?,
            "m" => {
                for line in render::memory_tab(self.feed.snapshot().raw.as_ref()) {
                    println!("{line}");
                }
            }
            "o" => {
                self.session.logout();
                println!("Signed out.");
                return Ok(false);
            }
            "q" => return Ok(false),
            other => println!("Unknown command: {other} (t/p/w/m/o/q)"),
        }
        Ok(true)
    }

    async fn edit_profile(&self, lines: &mut InputLines) -> Result<()> {
        println!("Edit profile - leave a field empty to keep its current value.");
        let update = ProfileUpdate {
            username: read_optional(lines, "Username").await?,
            email: read_optional(lines, "Email").await?,
            bio: read_optional(lines, "Bio").await?,
            ..Default::default()
        };

        if update.is_empty() {
            println!("Nothing to update.");
            return Ok(());
        }

        match self.profile.update_profile(&update).await {
            Ok(user) => println!("Profile updated for {}.", user.username),
            Err(e) => println!("{}", e.user_message()),
        }
        Ok(())
    }

    async fn change_password(&self, lines: &mut InputLines) -> Result<()> {
        let change = PasswordChange {
            current: read_field(lines, "Current password").await?,
            new_password: read_field(lines, "New password").await?,
            confirm: read_field(lines, "Confirm new password").await?,
        };

        // Validated locally before the service is called
        if let Err(message) = change.validate() {
            println!("{message}");
            return Ok(());
        }

        match self
            .profile
            .change_password(&change.current, &change.new_password)
            .await
        {
            Ok(()) => println!("Password changed."),
            Err(e) => println!("{}", e.user_message()),
        }
        Ok(())
    }
}

async fn read_field(lines: &mut InputLines, label: &str) -> Result<String> {
    println!("{label}:");
    Ok(lines.next_line().await?.unwrap_or_default().trim().to_string())
}

async fn read_optional(lines: &mut InputLines, label: &str) -> Result<Option<String>> {
    let value = read_field(lines, label).await?;
    Ok(if value.is_empty() { None } else { Some(value) })
}
