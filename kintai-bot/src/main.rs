use tracing_subscriber::EnvFilter;

mod adapters;
mod app_state;
mod auth;
mod config;
mod domain;
mod factory;
mod router;
mod routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing("kintai_bot=debug,teamspirit=debug,tower_http=info");

    let config = config::read_config()?;
    let addr = format!("{}:{}", config.application.host, config.application.port);
    let app = router::create(config)?;

    tracing::info!(addr = %addr, "starting kintai-bot");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
