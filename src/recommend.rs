use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, warn};

use crate::server::AppState;
use crate::upstream::UpstreamError;
use crate::validate::{validate_request, ValidationErrors};

/// Response extension set on 502s. The request log uses it to tell which
/// upstream failure sat behind the generic body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamFailure(pub &'static str);

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request")]
    Invalid(ValidationErrors),
    #[error("Backend request failed: {0}")]
    Backend(#[from] UpstreamError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Invalid(detail) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Invalid request", "detail": detail })),
            )
                .into_response(),
            // Upstream status and body stay internal.
            ApiError::Backend(e) => {
                let mut response = (
                    StatusCode::BAD_GATEWAY,
                    Json(json!({ "error": "Backend request failed" })),
                )
                    .into_response();
                response.extensions_mut().insert(UpstreamFailure(e.kind()));
                response
            }
        }
    }
}

/// `POST /api/recommendations`
///
/// Validates the body, forwards the normalized request upstream and relays
/// the upstream JSON unchanged.
pub async fn recommendations(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let value: serde_json::Value = serde_json::from_slice(&body)
        .map_err(|_| ApiError::Invalid(ValidationErrors::form("Invalid JSON body")))?;

    let req = validate_request(&value).map_err(|errors| {
        debug!(errors = ?errors.field_errors, "Rejected recommendation request");
        ApiError::Invalid(errors)
    })?;

    let movies = state.backend.query(&req).await.map_err(|e| {
        warn!(error = %e, "Recommendation backend failed");
        ApiError::Backend(e)
    })?;

    let mut response = Response::new(Body::from(movies));
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        header::HeaderValue::from_static("application/json"),
    );
    Ok(response)
}
