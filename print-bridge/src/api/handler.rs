//! Print request handler
//!
//! | Method | Response |
//! |--------|----------|
//! | OPTIONS | 200, empty body (CORS preflight) |
//! | POST | 200, print outcome JSON |
//! | other | 405, failure JSON |
//!
//! The request path is ignored. Every response carries permissive CORS
//! headers.

use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
};

use crate::core::AppState;
use crate::printing::{PrintMethod, PrintOutcome};

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const METHOD_NOT_SUPPORTED: &str = "method not supported";

pub async fn handle_request(State(state): State<AppState>, method: Method, body: Bytes) -> Response {
    let mut response = match method {
        Method::OPTIONS => (StatusCode::OK, [(header::CONTENT_LENGTH, "0")]).into_response(),
        Method::POST => {
            let outcome = state.print_service.handle_order(&body).await;
            (StatusCode::OK, Json(outcome)).into_response()
        }
        other => {
            tracing::debug!(method = %other, "Unsupported method");
            let outcome = PrintOutcome::failure(PrintMethod::Error, METHOD_NOT_SUPPORTED);
            (
                StatusCode::METHOD_NOT_ALLOWED,
                [(header::ALLOW, ALLOWED_METHODS)],
                Json(outcome),
            )
                .into_response()
        }
    };

    let headers = response.headers_mut();
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    response
}
