pub mod config;
pub mod error;
pub mod models;
pub mod routes;
pub mod state;
pub mod store;
pub mod sync;
pub mod vcs;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::SharedState;

pub fn build_app(state: SharedState) -> Router {
    // Only the local frontend origin is allowed. Methods and headers mirror
    // the request because credentialed CORS rules out wildcards.
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:3000"))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Router::new()
        .merge(routes::api_routes())
        .route("/health", axum::routing::get(health))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
