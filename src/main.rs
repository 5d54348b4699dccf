use schedule_exporter::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting schedule-exporter");

    // Load configuration
    let config = startup::load_config().await?;

    // Run the interactive session
    startup::start_session(config).await
}
