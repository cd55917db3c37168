use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use career_coach::cli::CliChannel;
use career_coach::coach::Orchestrator;
use career_coach::config::CoachConfig;
use career_coach::session::{InMemorySnapshotStore, SessionManager, spawn_cleanup_task};
use career_coach::store::InMemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_filter =
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // Keep the guard alive so buffered log lines are flushed on exit.
    let _log_guard = match std::env::var("COACH_LOG_DIR") {
        Ok(dir) => {
            let appender = tracing_appender::rolling::daily(&dir, "career-coach.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        Err(_) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_target(false)
                .with_writer(std::io::stderr)
                .init();
            None
        }
    };

    let config = CoachConfig::from_env().context("invalid COACH_* configuration")?;

    eprintln!("Career Coach v{}", env!("CARGO_PKG_VERSION"));
    eprintln!(
        "   Session timeout: {}s (warning at {}s)",
        config.session.timeout.as_secs(),
        config.session.warning.as_secs()
    );
    eprintln!("   Commands: /done <action-id>, /end, /quit\n");

    let sessions = SessionManager::new(config.session, Arc::new(InMemorySnapshotStore::new()));
    let _cleanup_handle = spawn_cleanup_task(sessions.clone(), config.cleanup_interval);

    let orchestrator = Orchestrator::new(&config, Arc::new(InMemoryStore::new()), sessions);

    let cli = CliChannel::new();
    let lines = cli.start();
    cli.run(&orchestrator, lines).await;

    let stats = orchestrator.sessions().get_stats().await;
    tracing::info!(active = stats.active, preserved = stats.preserved, "Shutting down");
    Ok(())
}
