use tracing_subscriber::EnvFilter;

// This main function is the entry point when running `cargo run -p web-server`.
// Its only job is to load the settings and call `run_server` from the crate's library.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = configuration::load_config()?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.filter.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    web_server::run_server(&config).await
}
