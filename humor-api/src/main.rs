mod routes;

use humor_app::config::Config;
use humor_app::AppContext;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::from_env().expect("Failed to load configuration");

    let app_context = AppContext::from_config(&config)
        .await
        .expect("Failed to initialise application context");

    let app = routes::router(app_context);

    tracing::info!("Listening on http://{}", config.bind_addr);
    tracing::info!(
        "Store and identity calls time out after {}s",
        config.request_timeout.as_secs()
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .expect("Failed to bind address");

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
