pub mod forms;

use axum::routing::{get, post};
use axum::Router;

use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/submit-form", post(forms::submit))
        .route("/form-data", get(forms::list))
}
