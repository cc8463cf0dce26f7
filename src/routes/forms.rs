use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::error::AppError;
use crate::models::Submission;
use crate::state::SharedState;

/// Body of a submission. Both fields are required and `data` must be a JSON
/// object; anything else is rejected by deserialization before a file write
/// can happen.
#[derive(Deserialize)]
pub struct FormData {
    #[serde(rename = "selectedEndpoint")]
    pub selected_endpoint: String,
    pub data: Map<String, Value>,
}

pub async fn submit(
    State(state): State<SharedState>,
    Json(form): Json<FormData>,
) -> Result<Json<Value>, AppError> {
    let submission = Submission::new(form.selected_endpoint, form.data);

    if let Some(sync) = &state.sync {
        sync.begin_write().await?;
    }

    state.store.append(&submission)?;

    if let Some(sync) = &state.sync {
        let message = format!(
            "Add form submission {}",
            submission.timestamp.to_rfc3339()
        );
        sync.publish(&message).await?;
    }

    Ok(Json(json!({
        "message": "Form data saved successfully",
        "timestamp": submission.timestamp.to_rfc3339(),
    })))
}

pub async fn list(State(state): State<SharedState>) -> Result<Json<Value>, AppError> {
    if let Some(sync) = &state.sync {
        sync.refresh().await?;
    }

    let rows = state.store.read_all()?;
    Ok(Json(json!({ "data": rows })))
}
