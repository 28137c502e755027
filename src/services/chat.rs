//! Chat Exchange Service
//!
//! Orchestrates one best-effort chat round trip:
//! fetch profile, render the system instruction, load and map prior turns,
//! call the generation endpoint, then append both new turns to history in
//! a single additive write. No retries, no queuing; every failure surfaces
//! directly as the response to the request that caused it.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::generation::GenerationClient;
use crate::models::turn::ConversationTurn;
use crate::services::context::{render_instruction, to_generation_history};
use crate::storage::repository::{HistoryRepository, ProfileRepository};

/// Chat service trait
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Run one chat exchange for a user and return the generated reply.
    async fn exchange(&self, user_id: &str, message: &str) -> Result<String>;
}

/// Chat service implementation over injected collaborators
pub struct ChatServiceImpl {
    profiles: Arc<dyn ProfileRepository>,
    history: Arc<dyn HistoryRepository>,
    generation: Arc<dyn GenerationClient>,
}

impl ChatServiceImpl {
    /// Create a new service instance
    pub fn new(
        profiles: Arc<dyn ProfileRepository>,
        history: Arc<dyn HistoryRepository>,
        generation: Arc<dyn GenerationClient>,
    ) -> Self {
        Self {
            profiles,
            history,
            generation,
        }
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn exchange(&self, user_id: &str, message: &str) -> Result<String> {
        // Input validation happens before any external call.
        let user_id = user_id.trim();
        let message = message.trim();
        if user_id.is_empty() {
            return Err(AppError::Validation("user_id cannot be empty".to_string()));
        }
        if message.is_empty() {
            return Err(AppError::Validation("message cannot be empty".to_string()));
        }

        info!("Starting chat exchange for user: {}", user_id);

        let profile = self.profiles.get(user_id).await?;
        if profile.is_none() {
            debug!("No profile for user {}, using generic instruction", user_id);
        }
        let instruction = render_instruction(profile.as_ref(), Utc::now().date_naive());

        let stored_turns = self.history.load(user_id).await?;
        debug!(
            "Loaded {} prior turn(s) for user: {}",
            stored_turns.len(),
            user_id
        );
        let history = to_generation_history(&stored_turns);

        let reply = self
            .generation
            .generate(&instruction, &history, message)
            .await?;

        // Both sides of the exchange share one capture timestamp and go in
        // one additive write, so a failure never records only one of them.
        let now = Utc::now();
        let turns = ConversationTurn::exchange_pair(message, &reply, now);
        self.history.append(user_id, &turns).await?;

        info!("Chat exchange completed for user: {}", user_id);
        Ok(reply)
    }
}

/// 创建聊天服务
pub fn create_chat_service(
    profiles: Arc<dyn ProfileRepository>,
    history: Arc<dyn HistoryRepository>,
    generation: Arc<dyn GenerationClient>,
) -> Box<dyn ChatService> {
    Box::new(ChatServiceImpl::new(profiles, history, generation))
}
