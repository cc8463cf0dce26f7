use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::AppError;

/// One accepted form submission. The timestamp is generated server-side at
/// receipt; rows are append-only and never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub timestamp: DateTime<Utc>,
    pub endpoint: String,
    pub form_data: Map<String, Value>,
}

impl Submission {
    pub fn new(endpoint: String, form_data: Map<String, Value>) -> Self {
        Self {
            timestamp: Utc::now(),
            endpoint,
            form_data,
        }
    }

    /// The three-column CSV record: the payload is stored as a JSON document
    /// so listing can round-trip the original values.
    pub fn to_record(&self) -> Result<[String; 3], AppError> {
        let form_data = serde_json::to_string(&self.form_data)
            .map_err(|e| AppError::Internal(format!("Failed to encode form data: {e}")))?;
        Ok([self.timestamp.to_rfc3339(), self.endpoint.clone(), form_data])
    }
}
