#[cfg(test)]
mod api_router_tests {
    use axum::{
        body::to_bytes,
        http::{Request, StatusCode},
    };
    use async_trait::async_trait;
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    use crate::api::{app_state::AppState, create_router};
    use crate::error::{AppError, Result};
    use crate::generation::{Content, GenerationClient};
    use crate::models::profile::UserProfile;
    use crate::models::turn::ConversationTurn;
    use crate::services::chat::create_chat_service;
    use crate::storage::repository::{HistoryRepository, ProfileRepository};

    #[derive(Default)]
    struct FakeProfiles {
        profile: Option<UserProfile>,
        upserted: Mutex<Option<UserProfile>>,
    }

    #[async_trait]
    impl ProfileRepository for FakeProfiles {
        async fn get(&self, _user_id: &str) -> Result<Option<UserProfile>> {
            Ok(self.profile.clone())
        }

        async fn upsert(&self, _user_id: &str, profile: &UserProfile) -> Result<()> {
            *self.upserted.lock().unwrap() = Some(profile.clone());
            Ok(())
        }
    }

    #[derive(Default)]
    struct FakeHistory;

    #[async_trait]
    impl HistoryRepository for FakeHistory {
        async fn load(&self, _user_id: &str) -> Result<Vec<ConversationTurn>> {
            Ok(Vec::new())
        }

        async fn append(&self, _user_id: &str, _turns: &[ConversationTurn]) -> Result<()> {
            Ok(())
        }
    }

    struct FakeGeneration;

    #[async_trait]
    impl GenerationClient for FakeGeneration {
        async fn generate(
            &self,
            _system_instruction: &str,
            _history: &[Content],
            _message: &str,
        ) -> Result<String> {
            Ok("stubbed reply".to_string())
        }
    }

    struct FailingGeneration;

    #[async_trait]
    impl GenerationClient for FailingGeneration {
        async fn generate(
            &self,
            _system_instruction: &str,
            _history: &[Content],
            _message: &str,
        ) -> Result<String> {
            Err(AppError::Upstream("model offline".to_string()))
        }
    }

    fn test_app(profiles: Arc<FakeProfiles>, generation: Arc<dyn GenerationClient>) -> axum::Router {
        let history = Arc::new(FakeHistory);
        let chat_service = create_chat_service(profiles.clone(), history, generation);
        create_router(AppState::new(chat_service, profiles))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_chat_returns_reply() {
        let app = test_app(Arc::new(FakeProfiles::default()), Arc::new(FakeGeneration));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/chat")
                    .header("Content-Type", "application/json")
                    .body(json!({"user_id": "U2", "message": "hi"}).to_string())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["reply"], "stubbed reply");
    }

    #[tokio::test]
    async fn test_chat_with_empty_message_returns_400() {
        let app = test_app(Arc::new(FakeProfiles::default()), Arc::new(FakeGeneration));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/chat")
                    .header("Content-Type", "application/json")
                    .body(json!({"user_id": "U2", "message": ""}).to_string())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_chat_upstream_failure_returns_500() {
        let app = test_app(Arc::new(FakeProfiles::default()), Arc::new(FailingGeneration));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/chat")
                    .header("Content-Type", "application/json")
                    .body(json!({"user_id": "U2", "message": "hi"}).to_string())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "UPSTREAM_ERROR");
        assert!(body["message"].as_str().unwrap().contains("model offline"));
    }

    #[tokio::test]
    async fn test_get_profile_returns_200_for_existing() {
        let profiles = Arc::new(FakeProfiles {
            profile: Some(UserProfile {
                name: Some("Ana".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        });
        let app = test_app(profiles, Arc::new(FakeGeneration));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/profiles/U2")
                    .body(String::new())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["user_id"], "U2");
        assert_eq!(body["profile"]["name"], "Ana");
    }

    #[tokio::test]
    async fn test_get_profile_returns_404_for_non_existing() {
        let app = test_app(Arc::new(FakeProfiles::default()), Arc::new(FakeGeneration));

        let response = app
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri("/api/v1/profiles/U1")
                    .body(String::new())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upsert_profile_merges_fields() {
        let profiles = Arc::new(FakeProfiles::default());
        let app = test_app(profiles.clone(), Arc::new(FakeGeneration));

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/profiles/U2")
                    .header("Content-Type", "application/json")
                    .body(
                        json!({"name": "Ana", "healthGoals": "better sleep"}).to_string(),
                    )
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "success");

        let upserted = profiles.upserted.lock().unwrap().clone().unwrap();
        assert_eq!(upserted.name.as_deref(), Some("Ana"));
        assert_eq!(upserted.health_goals.as_deref(), Some("better sleep"));
    }

    #[tokio::test]
    async fn test_upsert_empty_profile_returns_400() {
        let app = test_app(Arc::new(FakeProfiles::default()), Arc::new(FakeGeneration));

        let response = app
            .oneshot(
                Request::builder()
                    .method("PUT")
                    .uri("/api/v1/profiles/U2")
                    .header("Content-Type", "application/json")
                    .body(json!({}).to_string())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
