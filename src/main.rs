//! Carrier Chat server binary.

use std::sync::Arc;

use axum::http::{header, HeaderValue, Method};
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use carrier_chat::adapters::ai::OpenAIProvider;
use carrier_chat::adapters::catalog::{InMemoryCatalog, PostgresCatalog};
use carrier_chat::adapters::http::chat::{chat_router, ChatAppState};
use carrier_chat::adapters::session::{InMemoryKeyValueStore, RedisKeyValueStore};
use carrier_chat::application::{
    ChatService, FlowController, IntentClassifier, SessionRepository, StreamComposer,
};
use carrier_chat::config::{AppConfig, ServerConfig};
use carrier_chat::ports::{AIProvider, CatalogReader, KeyValueStore};

fn init_tracing(config: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level));

    if config.is_production() {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}

fn cors_layer(server: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if origins.is_empty() {
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(AllowOrigin::list(origins))
    }
}

async fn build_store(config: &AppConfig) -> Result<Arc<dyn KeyValueStore>, Box<dyn std::error::Error>> {
    match config.session.redis_url.as_deref().filter(|u| !u.is_empty()) {
        Some(url) => {
            let store = RedisKeyValueStore::connect(url, config.session.timeout()).await?;
            tracing::info!("Session store: redis");
            Ok(Arc::new(store))
        }
        None => {
            tracing::warn!("Session store: in-memory (single instance only)");
            Ok(Arc::new(InMemoryKeyValueStore::new(config.session.max_sessions * 2)))
        }
    }
}

async fn build_catalog(config: &AppConfig) -> Result<Arc<dyn CatalogReader>, Box<dyn std::error::Error>> {
    match config.catalog.url() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.catalog.max_connections)
                .acquire_timeout(config.catalog.acquire_timeout())
                .connect(url)
                .await?;
            tracing::info!("Catalog: postgres");
            Ok(Arc::new(PostgresCatalog::new(pool)))
        }
        None => {
            tracing::warn!("Catalog: built-in sample data");
            Ok(Arc::new(InMemoryCatalog::sample()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config);

    if let Err(e) = config.validate() {
        tracing::error!(error = %e, "Invalid configuration");
        return Err(e.into());
    }

    tracing::info!("Starting Carrier Chat v{}", env!("CARGO_PKG_VERSION"));

    let provider_config = config.ai.provider_config()?;
    let ai: Arc<dyn AIProvider> = Arc::new(OpenAIProvider::new(provider_config)?);
    let provider_info = ai.provider_info();
    tracing::info!(provider = %provider_info.name, model = %provider_info.model, "AI provider ready");

    let store = build_store(&config).await?;
    let sessions = SessionRepository::new(store, config.session.policy());
    sessions.configure_store().await;

    let catalog = build_catalog(&config).await?;

    let classifier =
        IntentClassifier::new(Arc::clone(&ai)).with_timeout(config.ai.classify_timeout());
    let controller = FlowController::new(classifier, catalog);
    let composer = StreamComposer::new(Arc::clone(&ai), sessions.clone())
        .with_chunk_delay(config.chat.chunk_delay());
    let service = ChatService::new(sessions, controller, composer)
        .with_default_tone(config.chat.default_tone);

    let router = chat_router()
        .layer(TimeoutLayer::new(config.server.request_timeout()))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.server))
        .with_state(ChatAppState::new(service, provider_info));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %addr, "API server listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
            }
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
