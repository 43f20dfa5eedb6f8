mod config;

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pagewatch_core::app::AppBuilder;
use pagewatch_core::impls::{InMemorySnapshotStore, NotionRecordSource, SmtpNotifier};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    // (A) ポート実装を用意
    let source = Arc::new(
        NotionRecordSource::new(config.notion_key.as_str(), config.notion_database_id.as_str())?
            .with_properties(config.status_property.as_str(), config.title_property.as_str()),
    );
    let notifier = Arc::new(SmtpNotifier::new(
        &config.email_host,
        config.email_port,
        &config.email_user,
        &config.email_pass,
        &config.email_from,
        &config.email_to,
    )?);
    let store = Arc::new(InMemorySnapshotStore::new());

    // (B) ループを組み立てる
    let poll = AppBuilder::new()
        .source(source)
        .store(store)
        .notifier(notifier)
        .period(config.refresh_period)
        .build()?;

    // (C) Ctrl-C で shutdown を流す
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = shutdown_tx.send(true);
        }
    });

    info!(
        period_ms = config.refresh_period.as_millis() as u64,
        database = %config.notion_database_id,
        "pagewatch starting"
    );
    poll.run(shutdown_rx).await?;
    info!("pagewatch stopped");
    Ok(())
}
