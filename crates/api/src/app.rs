//! Application assembly: routes plus the middleware stack.
//!
//! `main` and the integration tests both build the service through
//! [`build_router`], so tests run against the exact production layering.

use std::time::Duration;

use axum::http::header::{InvalidHeaderValue, AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::routes;
use crate::state::AppState;

const REQUEST_ID_HEADER: &str = "x-request-id";
const CORS_MAX_AGE: Duration = Duration::from_secs(3600);

/// Build the full router for `state`.
///
/// Layers wrap outward in the order they are added, so CORS sees a request
/// first and the panic catcher sits closest to the handlers.
///
/// Fails if a configured CORS origin is not a valid header value.
pub fn build_router(state: AppState) -> Result<Router, InvalidHeaderValue> {
    let cors = cors_layer(&state.config.cors_origins)?;
    let timeout = Duration::from_secs(state.config.request_timeout_secs);
    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);

    let router = Router::new()
        .merge(routes::health::router())
        .nest("/api/v1", routes::api_routes())
        .layer(CatchPanicLayer::new())
        .layer(TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, timeout))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
        .layer(cors)
        .with_state(state);

    Ok(router)
}

fn cors_layer(origins: &[String]) -> Result<CorsLayer, InvalidHeaderValue> {
    let origins = origins
        .iter()
        .map(|origin| HeaderValue::from_str(origin))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(CORS_MAX_AGE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cors_rejects_origin_with_control_characters() {
        assert!(cors_layer(&["http://ok.test".to_string(), "bad\norigin".to_string()]).is_err());
    }

    #[test]
    fn cors_accepts_configured_origins() {
        assert!(cors_layer(&["http://localhost:5173".to_string()]).is_ok());
    }
}
