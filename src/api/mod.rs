//! HTTP surface - the admin AJAX endpoint plus a few supporting routes.
//!
//! Every admin route authenticates with a bearer token. The AJAX actions also
//! carry a nonce bound to the admin and the profile's nonce action.

pub mod admin;
pub mod ajax;
pub mod auth;
pub mod error;
pub mod health;
pub mod nonce;
pub mod params;
pub mod response;
pub mod state;

pub use error::AjaxError;
pub use state::AppState;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

/// Path the admin page posts its actions to.
pub const AJAX_PATH: &str = "/wp-admin/admin-ajax.php";

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .route(AJAX_PATH, post(ajax::admin_ajax))
        .route("/api/nonce", get(admin::issue_nonce))
        .route("/api/forms", get(admin::forms))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .with_state(state)
}
