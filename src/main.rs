//! AutoML pipeline: main entry point

use clap::Parser;
use automl_pipeline::cli::{cmd_serve, cmd_train, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "automl_pipeline=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Train { data, predict }) => {
            cmd_train(&data, predict.as_deref())?;
        }
        Some(Commands::Serve { host, port }) => {
            cmd_serve(host, port).await?;
        }
        None => {
            // Default: serve with env/default configuration
            cmd_serve(None, None).await?;
        }
    }

    Ok(())
}
