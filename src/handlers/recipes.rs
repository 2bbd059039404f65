//! Recipe parsing endpoint.
//!
//! `POST /api/recipes/parse` takes `{"url": "..."}` and answers with the
//! extracted recipe, or a `{"message": "..."}` body explaining why not.

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::error::Error;
use crate::handlers::status::AppState;

/// Error body returned by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable explanation
    pub message: String,
}

impl MessageResponse {
    fn reply(status: StatusCode, message: impl Into<String>) -> Response {
        (
            status,
            Json(MessageResponse {
                message: message.into(),
            }),
        )
            .into_response()
    }
}

const URL_REQUIRED: &str = "url is required";

/// Map a service error onto a status code and message.
pub fn error_response(err: &Error) -> Response {
    let status = match err {
        Error::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        Error::Fetch(_) | Error::Extraction(_) => StatusCode::UNPROCESSABLE_ENTITY,
    };
    MessageResponse::reply(status, err.user_message())
}

/// The `url` field of a request body, if it is a non-empty string.
fn requested_url(body: &Value) -> Option<&str> {
    body.get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
}

/// `POST /api/recipes/parse`
#[instrument(skip_all)]
pub async fn parse_recipe_handler(
    State(state): State<Arc<AppState>>,
    body: Result<Json<Value>, JsonRejection>,
) -> Response {
    // A missing, mistyped or unparsable body carries no url either
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!("Rejected request body: {}", rejection.body_text());
            Value::Null
        }
    };
    let Some(url) = requested_url(&body) else {
        return MessageResponse::reply(StatusCode::BAD_REQUEST, URL_REQUIRED);
    };

    info!("Parsing recipe from {}", url);
    let started = Instant::now();
    let result = state.service().parse_url(url).await;
    state.record_latency(started.elapsed());

    match result {
        Ok(output) => {
            state.record_success(output.layer, output.recipe.partial);
            (StatusCode::OK, Json(output.recipe)).into_response()
        }
        Err(err) => {
            warn!("Recipe parse failed for {}: {}", url, err);
            state.record_failure();
            error_response(&err)
        }
    }
}

/// Router with the recipe endpoints.
pub fn recipes_router() -> axum::Router<Arc<AppState>> {
    axum::Router::new().route("/api/recipes/parse", post(parse_recipe_handler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExtractionError, FetchError};

    #[test]
    fn test_error_response_codes() {
        let cases = [
            (Error::InvalidUrl("x".to_string()), StatusCode::BAD_REQUEST),
            (Error::Fetch(FetchError::Forbidden), StatusCode::UNPROCESSABLE_ENTITY),
            (Error::Fetch(FetchError::Timeout(10)), StatusCode::UNPROCESSABLE_ENTITY),
            (
                Error::Extraction(ExtractionError::NoRecipeData),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(error_response(&err).status(), status, "for {}", err);
        }
    }

    #[test]
    fn test_requested_url() {
        assert_eq!(
            requested_url(&serde_json::json!({"url": "https://a.test"})),
            Some("https://a.test")
        );
        assert_eq!(requested_url(&serde_json::json!({"url": ""})), None);
        assert_eq!(requested_url(&serde_json::json!({"url": 7})), None);
        assert_eq!(requested_url(&serde_json::json!({})), None);
        assert_eq!(requested_url(&Value::Null), None);
    }
}
