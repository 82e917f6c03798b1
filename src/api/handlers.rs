use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode, header},
};
use std::sync::Arc;
use std::time::Instant;

use crate::data_models::AnalysisResult;
use crate::keyword_engine::{AnalyzeError, KeywordEngine};
use crate::search::SearchError;

use super::models::{AnalyzeRequest, ErrorResponse};

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error. Please try again later.";

pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Maps an analysis failure to the status and message sent to the client. Provider errors
/// keep the provider's status; anything unexpected becomes a generic 500.
pub fn error_response(err: &AnalyzeError) -> ApiError {
    let (status, message) = match err {
        AnalyzeError::MissingUrl | AnalyzeError::InvalidUrl(_) | AnalyzeError::InvalidBody(_) => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        AnalyzeError::MissingApiKey => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()),
        AnalyzeError::Search(SearchError::Upstream { status, .. }) => (
            status
                .and_then(|s| StatusCode::from_u16(s).ok())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            err.to_string(),
        ),
        AnalyzeError::Search(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_ERROR_MESSAGE.to_string(),
        ),
    };
    (status, Json(ErrorResponse::new(message)))
}

fn has_json_content_type(headers: &HeaderMap) -> bool {
    let Some(content_type) = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Reads an analyze request body. A body without a JSON content type, or an empty one,
/// carries no fields, so it ends up as a missing URL rather than a parse failure.
pub fn parse_analyze_request(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<AnalyzeRequest, AnalyzeError> {
    if !has_json_content_type(headers) || body.iter().all(u8::is_ascii_whitespace) {
        return Ok(AnalyzeRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AnalyzeError::InvalidBody(e.to_string()))
}

pub async fn analyze_handler(
    State(engine): State<Arc<KeywordEngine>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<AnalysisResult>, ApiError> {
    let start = Instant::now();

    let request = parse_analyze_request(&headers, &body).map_err(|err| {
        tracing::warn!(error = ?err, "rejected analyze request body");
        error_response(&err)
    })?;

    match engine.analyze(request.url.as_deref()).await {
        Ok(result) => {
            tracing::info!(
                url = result.url.as_str(),
                keywords = result.keywords.len(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "analysis complete"
            );
            Ok(Json(result))
        }
        Err(err) => {
            match &err {
                AnalyzeError::Search(SearchError::Transport(_) | SearchError::Decode(_)) => {
                    tracing::error!(error = %err, "analysis failed")
                }
                _ => tracing::warn!(error = ?err, "analysis rejected"),
            }
            Err(error_response(&err))
        }
    }
}
