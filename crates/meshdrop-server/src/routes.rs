//! HTTP routes for the generation API and the static frontend

use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::post,
    Router,
};
use meshdrop_core::{GenerateParams, MeshGenerator};
use serde::Deserialize;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

// Data-URL image payloads blow past axum's 2 MiB default
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// State shared across requests
pub struct AppState {
    pub generator: Arc<dyn MeshGenerator>,
}

/// Body of POST /api/generate3d
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub remove_background: bool,
}

/// Create the router: the generation endpoint plus the static frontend
pub fn create_router(state: Arc<AppState>, web_root: &Path) -> Router {
    Router::new()
        .route("/api/generate3d", post(generate_handler))
        .fallback_service(ServeDir::new(web_root).append_index_html_on_directories(true))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .with_state(state)
}

/// POST /api/generate3d
///
/// Forwards the image to the inference service and relays its JSON verbatim.
/// Missing image -> 400; anything else that fails (body parse included) ->
/// 500 with a fixed message, detail stays in the server log.
async fn generate_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> impl IntoResponse {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::error!("Error generating 3D model: {}", rejection);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate 3D model" })),
            );
        }
    };

    let image_url = match body.image_url {
        Some(url) if !url.is_empty() => url,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Image URL is required" })),
            );
        }
    };

    let params = GenerateParams {
        image_data_url: image_url,
        remove_background: body.remove_background,
    };

    match state.generator.generate(&params).await {
        Ok(result) => (StatusCode::OK, Json(result)),
        Err(e) => {
            tracing::error!("Error generating 3D model: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate 3D model" })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use meshdrop_core::{GeneratorError, GeneratorResult};
    use serde_json::Value;
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Returns a fixed payload and records what it was asked to generate
    struct MockGenerator {
        response: Value,
        seen: Mutex<Option<GenerateParams>>,
    }

    impl MockGenerator {
        fn returning(response: Value) -> Self {
            Self {
                response,
                seen: Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl MeshGenerator for MockGenerator {
        async fn generate(&self, params: &GenerateParams) -> GeneratorResult<Value> {
            *self.seen.lock().unwrap() = Some(params.clone());
            Ok(self.response.clone())
        }
    }

    struct FailingGenerator;

    #[async_trait]
    impl MeshGenerator for FailingGenerator {
        async fn generate(&self, _params: &GenerateParams) -> GeneratorResult<Value> {
            Err(GeneratorError::Failed("FAILED".to_string()))
        }
    }

    fn app(generator: Arc<dyn MeshGenerator>) -> Router {
        create_router(
            Arc::new(AppState { generator }),
            Path::new("web-does-not-exist"),
        )
    }

    fn post_json(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/generate3d")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_missing_image_url_is_400() {
        let app = app(Arc::new(MockGenerator::returning(json!({}))));
        let response = app
            .oneshot(post_json(r#"{"removeBackground": true}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Image URL is required" })
        );
    }

    #[tokio::test]
    async fn test_empty_image_url_is_400() {
        let app = app(Arc::new(MockGenerator::returning(json!({}))));
        let response = app
            .oneshot(post_json(r#"{"imageUrl": "", "removeBackground": false}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_success_relays_generator_json_verbatim() {
        let payload = json!({
            "data": {
                "model_mesh": {
                    "url": "https://cdn.example/mesh.glb",
                    "content_type": "model/gltf-binary",
                    "file_size": 123456
                },
                "timings": { "inference": 4.2 }
            },
            "requestId": "abc-123"
        });
        let generator = Arc::new(MockGenerator::returning(payload.clone()));
        let app = app(generator.clone());

        let response = app
            .oneshot(post_json(
                r#"{"imageUrl": "data:image/png;base64,AAAA", "removeBackground": true}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, payload);

        let seen = generator.seen.lock().unwrap().clone().unwrap();
        assert_eq!(seen.image_data_url, "data:image/png;base64,AAAA");
        assert!(seen.remove_background);
    }

    #[tokio::test]
    async fn test_remove_background_defaults_to_false() {
        let generator = Arc::new(MockGenerator::returning(json!({})));
        let app = app(generator.clone());

        let response = app
            .oneshot(post_json(r#"{"imageUrl": "data:image/png;base64,AAAA"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let seen = generator.seen.lock().unwrap().clone().unwrap();
        assert!(!seen.remove_background);
    }

    #[tokio::test]
    async fn test_malformed_body_is_500_with_fixed_message() {
        let app = app(Arc::new(MockGenerator::returning(json!({}))));
        let response = app.oneshot(post_json("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to generate 3D model" })
        );
    }

    #[tokio::test]
    async fn test_non_json_body_is_500_with_fixed_message() {
        let app = app(Arc::new(MockGenerator::returning(json!({}))));
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate3d")
                    .header("content-type", "text/plain")
                    .body(Body::from("an image, honest"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to generate 3D model" })
        );
    }

    #[tokio::test]
    async fn test_generator_failure_is_500_with_fixed_message() {
        let app = app(Arc::new(FailingGenerator));
        let response = app
            .oneshot(post_json(
                r#"{"imageUrl": "data:image/png;base64,AAAA", "removeBackground": false}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_json(response).await,
            json!({ "error": "Failed to generate 3D model" })
        );
    }
}
