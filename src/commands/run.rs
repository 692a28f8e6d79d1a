//! Announce a random session and keep it listed until interrupted.
//! Usage: sessionlist run <url> [--host H]

use anyhow::Result;
use colored::Colorize;

use super::announce::{build_announcement, AnnounceOptions};
use crate::config::Config;
use crate::directory::DirectoryClient;
use crate::lifecycle::{
    cancel_on_interrupt, CancellationToken, LifecycleController, LifecycleEvent,
};

pub fn execute(url: &str, config: &Config, options: &AnnounceOptions) -> Result<()> {
    let client = DirectoryClient::new(url, &config.http)?;
    let token = CancellationToken::new();
    cancel_on_interrupt(&token)?;

    let session = build_announcement(config, options);
    println!("Announcing random session at {}", client.base_url());

    let base_url = client.base_url().to_string();
    let mut controller = LifecycleController::new(&client, &token, config.lifecycle.clone())
        .with_observer(|event| report(event, &base_url));

    match controller.run(&session) {
        Ok(outcome) => {
            println!(
                "{} Unlisted {} after {} refresh(es)",
                "✓".green().bold(),
                outcome.credential.id,
                outcome.refreshes
            );
            Ok(())
        }
        Err(e) => {
            if let Some(body) = e.body() {
                println!("{body}");
            }
            Err(e.into())
        }
    }
}

fn report(event: &LifecycleEvent, base_url: &str) {
    match event {
        LifecycleEvent::Announced {
            credential,
            lease,
            refresh_period_minutes,
        } => {
            if let Some(message) = &lease.message {
                println!("{} {message}", "Message:".cyan());
            }
            println!(
                "Listed as {}. Refreshing announcement every {} minutes... (until Ctrl+C is pressed)",
                credential.id.to_string().bold(),
                refresh_period_minutes
            );
        }
        LifecycleEvent::Refreshed { count, message } => {
            println!("Refreshed listing at {base_url} ({count})");
            if let Some(message) = message {
                println!("{} {message}", "Message:".cyan());
            }
        }
        LifecycleEvent::Cancelled => {
            println!("\nUnlisting at {base_url}");
        }
        LifecycleEvent::Unlisted { status } => {
            println!("{}", format!("Unlisted (HTTP {status})").dimmed());
        }
        LifecycleEvent::CleanupUnlist { status } => match status {
            Some(status) => println!("{}", format!("Cleanup unlist: HTTP {status}").dimmed()),
            None => println!("{}", "Cleanup unlist failed".dimmed()),
        },
    }
}
