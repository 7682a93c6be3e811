use anyhow::Result;
use shortpath::config::{Config, load_from_env};
use shortpath::server;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = load_from_env()?;
    init_tracing(&config);

    config.print_summary();

    server::run(config).await
}

/// Installs the global subscriber from `RUST_LOG` and `LOG_FORMAT`.
fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if config.log_format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
