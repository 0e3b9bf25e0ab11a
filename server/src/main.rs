use server::settings::Settings;
use server::{database, router, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("server=info,tower_http=info")),
        )
        .init();

    let settings = Settings::new()?;

    let pool = database::connect(&settings.database.url).await?;
    let state = AppState::new(pool, settings.activity.url.clone())?;

    let addr = settings.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
