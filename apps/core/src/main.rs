// ACEE Core entry point
// Headless boot: load configuration and stored records, report the dashboard.

use acee_core::assistant::{ChatSession, IntentMatcher};
use acee_core::config::AppConfig;
use acee_core::store::SqliteStore;
use acee_core::{telemetry, Portal};
use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    telemetry::init(config.log_format);

    if config.database_url.is_none() {
        if let Err(e) = std::fs::create_dir_all(&config.data_dir) {
            error!("Failed to create data directory {:?}: {}", config.data_dir, e);
        }
    }

    let store = Arc::new(SqliteStore::connect(&config.database_url()).await?);
    let portal = Portal::load(store).await;

    match portal.user() {
        Some(user) => info!("Signed in as {} <{}>", user.name, user.email),
        None => info!("No active session"),
    }

    let dashboard = portal.dashboard(Utc::now());
    info!(
        courses = dashboard.total_courses,
        pending = dashboard.pending_assignments,
        due_today = dashboard.due_today,
        average = dashboard.overall_average,
        completion = dashboard.progress.assignment_completion,
        graded = dashboard.progress.exam_grading,
        "Dashboard"
    );
    for (band, count) in dashboard.distribution.bands() {
        info!("Grade {:?} ({}): {}", band, band.range(), count);
    }
    for deadline in &dashboard.upcoming {
        info!(
            "{} '{}' on {}{}",
            deadline.kind,
            deadline.title,
            deadline.date,
            if deadline.overdue { " (overdue)" } else { "" }
        );
    }

    let session = ChatSession::new(IntentMatcher::default(), config.typing_delay);
    if let Some(greeting) = session.messages().first() {
        info!("Assistant: {}", greeting.text);
    }
    info!("Try asking: {}", session.quick_replies(3).join(" | "));

    Ok(())
}
