use std::{net::SocketAddr, sync::Arc};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    routing::get,
};
use dotenv::dotenv;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod blog;
mod config;
mod error;
mod identity;
mod json;
mod schema;
mod store;

use config::{Env, ServerConfig};
use store::{
    CommentStore, SessionStore,
    postgres::{PgStore, build_pool},
};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Clone)]
pub struct App {
    pub comments: Arc<dyn CommentStore>,
    pub sessions: Arc<dyn SessionStore>,
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    dotenv().ok();

    init_tracing(&Env::from_env());

    let config = ServerConfig::new_from_env();

    let pool = build_pool(&config.database_url, config.database_max_connections)?;
    let store = Arc::new(PgStore::new(pool));

    let shared_state = App {
        comments: store.clone(),
        sessions: store,
    };

    let app = router(shared_state).layer(cors_layer(&config.cors_allowed_origins));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(env = ?config.env, "listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn router(state: App) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/comments", blog::routes::route())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn init_tracing(env: &Env) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match env {
        Env::Production => EnvFilter::new("info"),
        _ => EnvFilter::new(concat!(env!("CARGO_CRATE_NAME"), "=debug,tower_http=debug")),
    });

    let registry = tracing_subscriber::registry().with(filter);

    match env {
        Env::Production => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        _ => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins = origins.iter().filter_map(|o| match o.parse::<HeaderValue>() {
        Ok(origin) => Some(origin),
        Err(e) => {
            tracing::warn!(origin = %o, error = %e, "Ignoring invalid CORS origin");
            None
        }
    });

    // the session cookie has to cross origins, so credentials are allowed
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Could not listen for shutdown signal");
        return;
    }
    tracing::info!("Shutting down");
}
