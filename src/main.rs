use asklepios::api::{self, app_state::AppState};
use asklepios::config::loader::ConfigLoader;
use asklepios::generation::GeminiClient;
use asklepios::observability::{ObservabilityState, create_observability_router};
use asklepios::services::chat::create_chat_service;
use asklepios::storage::firestore::FirestoreClient;
use asklepios::storage::repository::{FirestoreHistoryRepository, FirestoreProfileRepository};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting Asklepios...");

    let config = ConfigLoader::load()?;
    ConfigLoader::validate(&config)?;
    info!("Configuration loaded successfully");

    let store_client = Arc::new(FirestoreClient::new(config.store.clone())?);
    info!("Document store client initialized");

    let profile_repository = Arc::new(FirestoreProfileRepository::new(
        store_client.clone(),
        &config.store.users_collection,
    ));
    let history_repository = Arc::new(FirestoreHistoryRepository::new(
        store_client.clone(),
        &config.store.chats_collection,
    ));
    info!("Repositories initialized");

    let generation_client = Arc::new(GeminiClient::new(&config.generation)?);
    info!(
        "Generation client initialized: {} ({})",
        config.generation.model, config.generation.base_url
    );

    let chat_service = create_chat_service(
        profile_repository.clone(),
        history_repository.clone(),
        generation_client,
    );
    info!("Chat service initialized");

    let app_state = AppState::new(chat_service, profile_repository);
    info!("Application state created");

    // 创建可观测性状态并集成路由
    let observability_state = Arc::new(ObservabilityState::new("0.1.0".to_string()));
    let api_router = api::create_router(app_state);
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
