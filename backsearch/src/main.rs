use anyhow::Context;
use backsearch::{
    spawn_settings_forwarder, AppConfig, AppContext, Application, LoggerConfig, UnifiedLogger,
};
use browser_connector::{event_channel, forward_events, LineTabController};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::{error, info};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env();

    if let Err(e) = UnifiedLogger::init(LoggerConfig::with_level(config.log_level.clone())) {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let controller = Arc::new(LineTabController::new(tokio::io::stdout()));
    let context = AppContext::new(config, controller)
        .await
        .context("failed to initialize application context")?;

    let (sender, receiver) = event_channel(context.config.event_queue_capacity);
    let forwarder = spawn_settings_forwarder(context.settings_store.clone(), sender.clone());

    let app = Application::start(context).await;
    let event_loop = tokio::spawn(app.run(receiver));

    let reader = tokio::spawn(async move {
        forward_events(BufReader::new(tokio::io::stdin()), &sender).await
    });

    match reader.await.context("host reader task panicked")? {
        Ok(stats) => info!(
            forwarded = stats.forwarded,
            skipped = stats.skipped,
            "Host input closed"
        ),
        Err(e) => error!("Host input failed: {}", e),
    }

    // the forwarder holds the last sender; the event loop drains once it stops
    forwarder.abort();
    let _ = forwarder.await;

    let stats = event_loop.await.context("event loop task panicked")?;
    info!(
        events = stats.events_handled,
        navigations = stats.navigations_issued,
        "BackSearch stopped"
    );

    Ok(())
}
