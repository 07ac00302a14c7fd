use serde::{Deserialize, Serialize};

/// Fallback message for failures that carry no usable description.
pub const UNKNOWN_ERROR: &str = "Unknown error";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoFailure {
    pub success: bool,
    pub error: String,
}

impl EchoFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message_or_unknown(message),
        }
    }
}

pub fn message_or_unknown(message: impl Into<String>) -> String {
    let message = message.into();
    if message.trim().is_empty() {
        UNKNOWN_ERROR.to_string()
    } else {
        message
    }
}
