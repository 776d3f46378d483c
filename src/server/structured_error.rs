use std::fmt::Display;

use serde::Serialize;
use serde_json::json;

use crate::logging::get_log_file_path;
use crate::server::error_mapping::ToStructuredError;

/// One entry of a [`StructuredError`].
#[derive(Debug, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tip: Option<String>,
}

impl ErrorMessage {
    pub fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            tip: None,
        }
    }

    #[must_use]
    pub fn with_tip(mut self, tip: Option<&str>) -> Self {
        self.tip = tip.map(str::to_string);
        self
    }
}

/// JSON document carried in the message of every error status the daemon
/// returns: `{ logs, messages: [{ code, message, tip? }] }`.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// Path of the daemon log file, empty when logging was never set up
    pub logs: String,
    pub messages: Vec<ErrorMessage>,
}

impl StructuredError {
    pub fn from_error<E: ToStructuredError + Display>(err: &E) -> Self {
        let (code, tip) = err.error_code_and_tip();
        Self {
            logs: get_log_file_path().to_string(),
            messages: vec![ErrorMessage::new(code, err.to_string()).with_tip(tip)],
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            json!({
                "logs": self.logs,
                "messages": [{
                    "code": "INTERNAL_ERROR",
                    "message": format!("failed to encode error: {e}"),
                }],
            })
            .to_string()
        })
    }
}

#[cfg(test)]
#[path = "structured_error_tests.rs"]
mod structured_error_tests;
