use axum::{routing::get, Router};
use game_relay::{intake, websockets, AppState, RelayConfig};
use std::future::IntoFuture;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "game_relay=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RelayConfig::from_env()?;
    info!(?config, "Starting game relay");

    // One registry and connection manager shared by both listeners
    let app_state = AppState::in_memory(config.delivery_timeout);

    let api = intake::router()
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state.clone());

    let sockets = Router::new()
        .route("/ws", get(websockets::websocket_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    let api_listener = tokio::net::TcpListener::bind(config.api_addr()).await?;
    info!("[API] Started API on {}", config.api_addr());

    let socket_listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
    info!(
        "[SOCKET] Started listening for socket connections on {}",
        config.socket_addr()
    );

    tokio::try_join!(
        axum::serve(api_listener, api).into_future(),
        axum::serve(socket_listener, sockets).into_future(),
    )?;
    Ok(())
}
