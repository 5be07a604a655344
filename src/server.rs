//! HTTP proxy exposing the assistant to the web client.
//!
//! A health probe at `/` and one chat endpoint, with permissive CORS so the
//! dev server can call it directly. Provider exhaustion still answers 200
//! with the apology text; only a missing question is a client error.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::orchestrator::Orchestrator;
use crate::tasks;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub ai: Arc<Orchestrator>,
}

/// Request body for the respond endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RespondRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub context_code: Option<String>,
}

/// Response body for the respond endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct RespondResponse {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Creates the proxy router: `GET /` health probe and `POST /api/ai/respond`,
/// with CORS and request tracing applied to both.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handle_health))
        .route("/api/ai/respond", post(handle_respond))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn handle_health() -> &'static str {
    "OK"
}

/// Handler for `POST /api/ai/respond`.
async fn handle_respond(
    State(state): State<AppState>,
    Json(request): Json<RespondRequest>,
) -> Result<Json<RespondResponse>, (StatusCode, Json<ErrorResponse>)> {
    let question = request.question.as_deref().map(str::trim).unwrap_or("");
    if question.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Missing question".to_string(),
            }),
        ));
    }

    let text = tasks::assistant_reply(&state.ai, question, request.context_code.as_deref()).await;
    Ok(Json(RespondResponse { text }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    /// Router over an empty lineup: every completion exhausts immediately,
    /// which keeps these tests off the network.
    fn test_router() -> Router {
        create_router(AppState {
            ai: Arc::new(Orchestrator::with_providers(Vec::new())),
        })
    }

    #[tokio::test]
    async fn test_health_probe_answers_ok() {
        let response = test_router()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_missing_question_is_a_client_error() {
        let response = test_router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/ai/respond")
                    .header("content-type", "application/json")
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "Missing question");
    }

    #[tokio::test]
    async fn test_blank_question_is_rejected() {
        let request_body = serde_json::json!({ "question": "   " });

        let response = test_router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/ai/respond")
                    .header("content-type", "application/json")
                    .body(Body::from(request_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_exhausted_lineup_still_answers_200() {
        let request_body = serde_json::json!({ "question": "ما هو المتغير؟" });

        let response = test_router()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/ai/respond")
                    .header("content-type", "application/json")
                    .body(Body::from(request_body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let parsed: RespondResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.text, "عذراً، المحرك الذكي غير متوفر حالياً.");
    }
}
