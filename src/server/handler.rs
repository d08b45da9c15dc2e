//! HTTP Handlers
//!
//! `POST /ask` and `GET /health`.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, error};

use super::context::AppContext;
use crate::error::Error;

/// Body returned for a missing or malformed query
pub const QUERY_NOT_PROVIDED: &str = "Query not provided";

/// `POST /ask` request body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    pub query: String,
}

/// `POST /ask` success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    pub answer: String,
}

/// Error body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Request failures
#[derive(Debug)]
pub enum ApiError {
    /// Body is not a JSON object with a non-blank string `query`
    QueryNotProvided,
    /// Anything that went wrong after validation
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::QueryNotProvided => (StatusCode::BAD_REQUEST, QUERY_NOT_PROVIDED.to_string()),
            ApiError::Internal(message) => {
                error!("Request failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, message)
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// `POST /ask`
pub async fn ask(State(ctx): State<Arc<AppContext>>, body: Bytes) -> Result<Json<AskResponse>, ApiError> {
    let start = Instant::now();
    let result = answer(&ctx, &body).await;
    ctx.metrics().record_request("/ask", start.elapsed(), result.is_ok());
    result
}

async fn answer(ctx: &Arc<AppContext>, body: &[u8]) -> Result<Json<AskResponse>, ApiError> {
    let query = parse_query(body).ok_or(ApiError::QueryNotProvided)?;

    // encode and scan are CPU-bound
    let worker = Arc::clone(ctx);
    let start = Instant::now();
    let answer = tokio::task::spawn_blocking(move || worker.ask(&query))
        .await
        .map_err(|e| ApiError::Internal(format!("Worker failed: {}", e)))??;

    debug!(
        index = answer.index,
        score = answer.score,
        latency = ?start.elapsed(),
        "Answered query"
    );

    Ok(Json(AskResponse { answer: answer.text }))
}

/// Extract a non-blank string `query` from a JSON object body
pub fn parse_query(body: &[u8]) -> Option<String> {
    match serde_json::from_slice::<Value>(body).ok()? {
        Value::Object(mut fields) => match fields.remove("query")? {
            Value::String(query) if !query.trim().is_empty() => Some(query),
            _ => None,
        },
        _ => None,
    }
}

/// `GET /health`
pub async fn health(State(ctx): State<Arc<AppContext>>) -> Json<Value> {
    let start = Instant::now();
    let kb = ctx.knowledge();
    let metrics = ctx.metrics().snapshot();
    let body = json!({
        "status": "ok",
        "model": ctx.embedder().model_name(),
        "passages": kb.len(),
        "dimension": kb.dimension(),
        "requests": metrics.requests,
        "errors": metrics.errors,
        "avg_latency_us": metrics.avg_latency_us,
        "started_at": ctx.started_at().to_rfc3339(),
    });
    ctx.metrics().record_request("/health", start.elapsed(), true);
    Json(body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::Corpus;
    use crate::embedder::testing::KeywordEmbedder;
    use crate::embedder::Embedder;
    use crate::knowledge::KnowledgeBase;
    use crate::vector::EmbeddingMatrix;

    fn context() -> Arc<AppContext> {
        let embedder = Arc::new(KeywordEmbedder::default());
        let passages = vec![
            "The sky is blue.".to_string(),
            "Cats are mammals.".to_string(),
            "Water boils at 100C.".to_string(),
        ];
        let rows = passages.iter().map(|p| embedder.encode(p).unwrap()).collect();
        let kb = KnowledgeBase::new(
            Corpus::from_passages(passages).unwrap(),
            EmbeddingMatrix::from_rows(rows).unwrap(),
        )
        .unwrap();
        Arc::new(AppContext::new(kb, embedder).unwrap())
    }

    #[test]
    fn test_parse_query() {
        assert_eq!(parse_query(br#"{"query": "hi"}"#), Some("hi".to_string()));
        assert_eq!(parse_query(br#"{"query": "hi", "extra": 1}"#), Some("hi".to_string()));
        assert_eq!(parse_query(br#"{}"#), None);
        assert_eq!(parse_query(br#"{"query": 42}"#), None);
        assert_eq!(parse_query(br#"{"query": null}"#), None);
        assert_eq!(parse_query(br#"{"query": "   "}"#), None);
        assert_eq!(parse_query(br#"["query"]"#), None);
        assert_eq!(parse_query(b"query=hi"), None);
        assert_eq!(parse_query(b""), None);
    }

    #[test]
    fn test_ask_handler() {
        let ctx = context();
        let body = Bytes::from_static(br#"{"query": "Why does water boil?"}"#);

        let Json(response) = tokio_test::block_on(ask(State(ctx.clone()), body)).unwrap();
        assert_eq!(response.answer, "Water boils at 100C.");
        assert_eq!(ctx.metrics().total_requests(), 1);
    }

    #[test]
    fn test_ask_handler_rejects_missing_query() {
        let ctx = context();
        let result = tokio_test::block_on(ask(State(ctx.clone()), Bytes::from_static(b"{}")));

        let response = result.unwrap_err().into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ctx.metrics().failed_requests(), 1);
    }

    #[test]
    fn test_internal_error_status() {
        let response = ApiError::from(Error::ZeroNormQuery).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
