use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::Source;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoRequest {
    pub message: String,
    pub timestamp: i64,
    pub source: Source,
}

impl EchoRequest {
    pub fn new(message: impl Into<String>, source: Source) -> Self {
        Self {
            message: message.into(),
            timestamp: Utc::now().timestamp_millis(),
            source,
        }
    }
}

// `data` carries the request body back verbatim; `received_at` crosses the
// wire as `receivedAt`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EchoResponse {
    pub success: bool,
    pub data: Value,
    pub received_at: DateTime<Utc>,
}

impl EchoResponse {
    pub fn new(data: Value) -> Self {
        Self {
            success: true,
            data,
            received_at: Utc::now(),
        }
    }
}
