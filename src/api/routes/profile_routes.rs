//! Profile Routes
//!
//! 定义画像相关的 API 路由。

use crate::api::handlers::profile_handler::*;
use axum::{
    Router,
    routing::{get, put},
};

use crate::api::app_state::AppState;

/// 创建画像路由器
pub fn create_profile_router() -> Router<AppState> {
    Router::new()
        .route("/profiles/:user_id", put(upsert_profile))
        .route("/profiles/:user_id", get(get_profile))
}
