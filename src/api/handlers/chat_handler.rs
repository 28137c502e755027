use axum::{Json, extract::State, response::IntoResponse};
use tracing::debug;

use crate::{
    api::{app_state::AppState, dto::chat_dto::*},
    error::AppError,
};

/// POST /api/v1/chat
///
/// 一次完整的聊天交互：画像个性化 + 历史上下文 + 生成回复 + 落盘。
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Chat request for user: {}", request.user_id);

    let reply = state
        .chat_service
        .exchange(&request.user_id, &request.message)
        .await?;

    Ok(Json(ChatResponse { reply }))
}
