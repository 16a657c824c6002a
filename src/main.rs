use clap::Parser;
use folio::cli::{Cli, Commands};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "folio=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { path, name }) => {
            folio::cli::init::run(path, name).await?;
        }
        Some(Commands::Serve { host, port }) => {
            folio::cli::serve::run(&cli.config, host, port).await?;
        }
        Some(Commands::Migrate) => {
            folio::cli::migrate::run(&cli.config).await?;
        }
        Some(Commands::User { command }) => {
            folio::cli::user::run(&cli.config, command).await?;
        }
        Some(Commands::Category { command }) => {
            folio::cli::taxonomy::run_category(&cli.config, command).await?;
        }
        Some(Commands::Tag { command }) => {
            folio::cli::taxonomy::run_tag(&cli.config, command).await?;
        }
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
        }
    }

    Ok(())
}
