use axum::serve;
use doc_relay::build_app;
use doc_relay::config::AppConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging; HTTP client internals stay quiet unless they fail
    use env_logger::{Builder, Env};
    use log::LevelFilter;

    Builder::from_env(Env::default().default_filter_or("info"))
        .filter_module("hyper", LevelFilter::Warn)
        .filter_module("reqwest", LevelFilter::Warn)
        .init();

    println!("doc-relay: Azure DevOps document relay");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{} upstream={}",
        config.server.host, config.server.port, config.upstream.host_prefix
    );

    let app = build_app(&config)?;

    run_server(app, &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("doc-relay server running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
