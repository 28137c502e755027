use crate::services::chat::ChatService;
use crate::storage::repository::ProfileRepository;
use std::sync::Arc;

/// Application state containing all shared services
#[derive(Clone)]
pub struct AppState {
    /// Chat service for the full exchange flow
    pub chat_service: Arc<dyn ChatService>,
    /// Profile repository for profile read/merge endpoints
    pub profile_repository: Arc<dyn ProfileRepository>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("chat_service", &"Arc<dyn ChatService>")
            .field("profile_repository", &"Arc<dyn ProfileRepository>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(
        chat_service: Box<dyn ChatService>,
        profile_repository: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            chat_service: Arc::from(chat_service),
            profile_repository,
        }
    }
}
