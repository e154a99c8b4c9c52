//! HTTP handlers

use axum::{
    Json,
    body::{Body, Bytes},
    extract::State,
    http::{Method, header},
    response::{IntoResponse, Response},
};
use futures::StreamExt;
use serde_json::json;
use tern_ai::ChatRequest;

use crate::{error::RelayError, server::AppState};

/// Content type of the streamed reply
pub const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";

/// Liveness probe
pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Any verb other than POST on the chat route
pub async fn method_not_allowed(method: Method) -> RelayError {
    tracing::debug!(method = %method, "rejecting chat request");
    RelayError::MethodNotAllowed
}

/// Forward a conversation upstream and stream back only the reply text
pub async fn chat(State(state): State<AppState>, body: Bytes) -> Result<Response, RelayError> {
    let request: ChatRequest = serde_json::from_slice(&body).map_err(RelayError::internal)?;

    let provider = state.provider.as_ref().ok_or(RelayError::CredentialMissing)?;

    tracing::info!(turns = request.messages.len(), "relaying chat request");

    let fragments = provider.stream_text(&request.messages).await?;
    let body = Body::from_stream(fragments.map(|fragment| fragment.map(Bytes::from)));

    Ok(([(header::CONTENT_TYPE, TEXT_PLAIN_UTF8)], body).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::RelayConfig, server::build_router};
    use axum::{
        Router,
        extract::Path,
        http::{Request, StatusCode},
        routing::post,
    };
    use tower::ServiceExt;

    async fn spawn_upstream(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn state_for(base_url: &str, api_key: Option<&str>) -> AppState {
        AppState::from_config(&RelayConfig {
            api_key: api_key.map(String::from),
            base_url: base_url.to_string(),
            model: "gemini-test".to_string(),
            ..Default::default()
        })
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/chat")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    const HELLO: &str = r#"{"messages":[{"role":"user","parts":[{"text":"Hello"}]}]}"#;

    #[tokio::test]
    async fn test_get_is_method_not_allowed() {
        let app = build_router(state_for("http://127.0.0.1:9", Some("k")));
        let response = app
            .oneshot(Request::get("/api/chat").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_string(response).await, r#"{"error":"Method not allowed"}"#);
    }

    #[tokio::test]
    async fn test_preflight_options_is_method_not_allowed() {
        let app = build_router(state_for("http://127.0.0.1:9", Some("k")));
        let request = Request::builder()
            .method("OPTIONS")
            .uri("/api/chat")
            .header(header::ORIGIN, "http://example.com")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body_string(response).await, r#"{"error":"Method not allowed"}"#);
    }

    #[tokio::test]
    async fn test_missing_key_is_500() {
        let app = build_router(state_for("http://127.0.0.1:9", None));
        let response = app.oneshot(chat_request(HELLO)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_string(response).await, r#"{"error":"API key not configured"}"#);
    }

    #[tokio::test]
    async fn test_malformed_body_is_internal_error() {
        let app = build_router(state_for("http://127.0.0.1:9", Some("k")));
        let response = app.oneshot(chat_request("{not json")).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"An internal error occurred."}"#
        );
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_internal_error() {
        // Port 9 (discard) is closed on loopback in test environments.
        let app = build_router(state_for("http://127.0.0.1:9", Some("k")));
        let response = app.oneshot(chat_request(HELLO)).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"An internal error occurred."}"#
        );
    }

    #[tokio::test]
    async fn test_upstream_error_is_forwarded_verbatim() {
        const UPSTREAM_BODY: &str =
            r#"{"error":{"code":429,"message":"Resource has been exhausted","status":"RESOURCE_EXHAUSTED"}}"#;

        async fn upstream() -> impl IntoResponse {
            (StatusCode::TOO_MANY_REQUESTS, UPSTREAM_BODY)
        }

        let base = spawn_upstream(Router::new().route("/models/{call}", post(upstream))).await;
        let app = build_router(state_for(&base, Some("k")));
        let response = app.oneshot(chat_request(HELLO)).await.unwrap();

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body_string(response).await, UPSTREAM_BODY);
    }

    #[tokio::test]
    async fn test_upstream_error_body_is_forwarded_byte_for_byte() {
        async fn upstream() -> impl IntoResponse {
            (StatusCode::BAD_REQUEST, b"bad \xff\xfe body".to_vec())
        }

        let base = spawn_upstream(Router::new().route("/models/{call}", post(upstream))).await;
        let app = build_router(state_for(&base, Some("k")));
        let response = app.oneshot(chat_request(HELLO)).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"bad \xff\xfe body");
    }

    #[tokio::test]
    async fn test_success_streams_plain_text() {
        async fn upstream(Path(call): Path<String>, body: Bytes) -> impl IntoResponse {
            assert_eq!(call, "gemini-test:streamGenerateContent");
            let request: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(request["contents"][0]["role"], "user");
            assert_eq!(request["generationConfig"]["maxOutputTokens"], 2048);

            let chunks: Vec<Result<&'static str, std::io::Error>> = vec![
                Ok("[{\"candidates\": [{\"content\": {\"parts\": [{\"text\": \"Hi \"}],\"role\": \"model\"}}]}\r\n"),
                Ok(",{\"candidates\": [{\"content\": {\"parts\": [{\"text\": \"there!\\n\\\"Quoted\\\"\"}],\"role\": \"model\"},\"finishReason\": \"STOP\"}]}]"),
            ];
            Body::from_stream(futures::stream::iter(chunks))
        }

        let base = spawn_upstream(Router::new().route("/models/{call}", post(upstream))).await;
        let app = build_router(state_for(&base, Some("k")));
        let response = app.oneshot(chat_request(HELLO)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            TEXT_PLAIN_UTF8
        );
        assert_eq!(body_string(response).await, "Hi there!\n\"Quoted\"");
    }

    #[tokio::test]
    async fn test_chunk_boundary_inside_multibyte_character() {
        async fn upstream() -> impl IntoResponse {
            let first = "[{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"Grüß \"}]},\"note\":\"🦀\"}]}";
            let second = ",{\"candidates\":[{\"content\":{\"parts\":[{\"text\":\"日本 🦀\"}]}}]}]";
            let body = [first, second].concat().into_bytes();
            // Cut two bytes into the crab of the first chunk's trailing field.
            let cut = first.find('🦀').unwrap() + 2;

            let chunks: Vec<Result<Vec<u8>, std::io::Error>> =
                vec![Ok(body[..cut].to_vec()), Ok(body[cut..].to_vec())];
            Body::from_stream(futures::stream::iter(chunks))
        }

        let base = spawn_upstream(Router::new().route("/models/{call}", post(upstream))).await;
        let app = build_router(state_for(&base, Some("k")));
        let response = app.oneshot(chat_request(HELLO)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "Grüß 日本 🦀");
    }

    #[tokio::test]
    async fn test_legacy_content_string_and_ai_role() {
        async fn upstream(body: Bytes) -> impl IntoResponse {
            let request: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(request["contents"][1]["role"], "model");
            assert_eq!(request["contents"][1]["parts"][0]["text"], "earlier reply");
            r#"[{"candidates":[{"content":{"parts":[{"text":"ok"}]}}]}]"#
        }

        let base = spawn_upstream(Router::new().route("/models/{call}", post(upstream))).await;
        let app = build_router(state_for(&base, Some("k")));
        let body = r#"{"messages":[{"role":"user","content":"hi"},{"role":"ai","content":"earlier reply"},{"role":"user","content":"again"}]}"#;
        let response = app.oneshot(chat_request(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "ok");
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(state_for("http://127.0.0.1:9", None));
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);
    }
}
