use clap::{Parser, Subcommand};
use configuration::{LoggingSettings, Settings};
use database::connection::{connect, run_migrations};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// The main entry point for the Tracklist catalog service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if present
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = configuration::load_config()?;
    let _guard = init_tracing(&config.logging);

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args, &mut config).await,
        Commands::Migrate => handle_migrate(&config).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A REST catalog of tracks, artists and albums.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply migrations and serve the HTTP API.
    Serve(ServeArgs),
    /// Apply database migrations and exit.
    Migrate,
}

#[derive(Parser)]
struct ServeArgs {
    /// Overrides `server.host` from the configuration.
    #[arg(long)]
    host: Option<String>,

    /// Overrides `server.port` from the configuration.
    #[arg(long)]
    port: Option<u16>,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_serve(args: ServeArgs, config: &mut Settings) -> anyhow::Result<()> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    web_server::run_server(config).await
}

async fn handle_migrate(config: &Settings) -> anyhow::Result<()> {
    let db_pool = connect(&config.database).await?;
    run_migrations(&db_pool).await?;
    tracing::info!(url = %config.database.url, "Migrations applied.");
    Ok(())
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over `logging.filter`.
///
/// The returned guard flushes buffered log lines on drop and must be held for
/// the life of the process.
fn init_tracing(settings: &LoggingSettings) -> WorkerGuard {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.filter.clone()));

    let (writer, guard) = match &settings.directory {
        Some(directory) => {
            tracing_appender::non_blocking(tracing_appender::rolling::daily(directory, "tracklist.log"))
        }
        None => tracing_appender::non_blocking(std::io::stdout()),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(settings.directory.is_none())
        .init();

    guard
}
