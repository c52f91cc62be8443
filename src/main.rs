use anyhow::{Context, Result};
use field_monitoring::config::{LoggingSettings, Settings};
use field_monitoring::domain::config_types::LogFormat;
use field_monitoring::Application;
use tracing_subscriber::EnvFilter;

fn init_tracing(logging: &LoggingSettings) {
    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(logging.level.as_str()));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.pretty().init(),
        LogFormat::Compact => builder.compact().init(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::new().context("failed to load configuration")?;
    init_tracing(&settings.logging);

    let app = Application::new(settings).await?;
    let report = app.run().await?;

    println!("{}", report.to_json()?);
    Ok(())
}
