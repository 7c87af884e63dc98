use anyhow::{bail, Result};
use clap::Subcommand;
use tracing::{error, info};

use conference_application::commands::sync_commands::sync_events;
use conference_application::queries::event_queries::list_events;
use conference_application::AppState;
use conference_domain::ports::HealthCheckService;
use conference_domain::ManagedEvent;

use crate::context::AppContext;

#[derive(Subcommand, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Command {
    /// Fetch all events and import them into the local store
    #[default]
    Sync,
    /// Print the events in the local store
    List,
    /// Check that the API and the local store are reachable
    Check,
}

pub async fn run(command: Command) -> Result<()> {
    let context = AppContext::new().await?;
    match command {
        Command::Sync => run_sync(&context.state).await,
        Command::List => run_list(&context.state).await,
        Command::Check => run_check(context.health.as_ref()).await,
    }
}

pub async fn run_sync(state: &AppState) -> Result<()> {
    let report = sync_events(state).await?;
    let metrics = state.metrics.snapshot();
    info!(
        url = %state.config.events_url(),
        store = %state.config.store_path,
        received = report.received,
        created = report.created,
        updated = report.updated,
        unchanged = report.unchanged,
        fetch_requests = metrics.fetch_requests,
        "sync complete"
    );
    Ok(())
}

pub async fn run_list(state: &AppState) -> Result<()> {
    let events = list_events(state).await?;
    if events.is_empty() {
        info!(store = %state.config.store_path, "no events stored, run `sync` first");
        return Ok(());
    }
    for event in &events {
        println!("{}", format_event_line(event));
    }
    Ok(())
}

pub async fn run_check(health: &dyn HealthCheckService) -> Result<()> {
    let mut failures = 0;
    match health.check_api().await {
        Ok(_) => info!("api reachable"),
        Err(err) => {
            error!("api check failed: {}", err);
            failures += 1;
        }
    }
    match health.check_store().await {
        Ok(_) => info!("store readable"),
        Err(err) => {
            error!("store check failed: {}", err);
            failures += 1;
        }
    }
    if failures > 0 {
        bail!("{} health check(s) failed", failures);
    }
    Ok(())
}

fn format_event_line(event: &ManagedEvent) -> String {
    let when = event
        .start_time
        .map(|start| start.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "unscheduled".to_string());
    let mut line = format!("{when} | {}", event.title);
    if let Some(room) = &event.room {
        line.push_str(&format!(" | {room}"));
    }
    if !event.speakers.is_empty() {
        line.push_str(&format!(" | {}", event.speakers.join(", ")));
    }
    line
}
