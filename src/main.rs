//! Aqariy - Main entry point

use clap::Parser;

use aqariy::cli::{cmd_info, cmd_judge, cmd_predict, cmd_serve, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aqariy=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            host,
            port,
            model_dir,
            static_dir,
        } => {
            cmd_serve(host, port, model_dir, static_dir).await?;
        }
        Commands::Predict { model_dir, input } => {
            cmd_predict(&model_dir, &input)?;
        }
        Commands::Judge {
            model_dir,
            input,
            listed_price,
        } => {
            cmd_judge(&model_dir, &input, listed_price)?;
        }
        Commands::Info { model_dir } => {
            cmd_info(&model_dir)?;
        }
    }

    Ok(())
}
