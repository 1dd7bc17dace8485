/// Cadence - command-line playlist manager
use cadence_cli::{App, CadenceConfig, Cli};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cadence=info,cadence_catalog=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => CadenceConfig::load_from(path)?,
        None => CadenceConfig::load()?,
    };
    if let Some(database_url) = cli.database_url {
        config.storage.database_url = database_url;
    }
    config.validate()?;

    tracing::debug!(database = %config.storage.database_url, "configuration loaded");

    let app = App::open(config).await?;
    let mut stdout = std::io::stdout().lock();
    app.run(cli.command, &mut stdout).await?;

    Ok(())
}
