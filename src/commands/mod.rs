pub mod analysis;

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, error};

use crate::error::{AppError, AppResult};
use crate::models::item::ScheduledItem;
use crate::models::settings::AdvisorSettings;

pub type CommandResult<T> = Result<T, CommandError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<JsonValue>,
}

impl CommandError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Option<JsonValue>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl From<AppError> for CommandError {
    fn from(error: AppError) -> Self {
        match error {
            AppError::Validation {
                message, details, ..
            } => CommandError::new("VALIDATION_ERROR", message, details),
            AppError::Serialization(error) => {
                error!(target: "app::command", error = %error, "serialization error in command");
                CommandError::new(
                    "SERIALIZATION_ERROR",
                    "malformed JSON input",
                    Some(serde_json::json!({
                        "line": error.line(),
                        "column": error.column(),
                        "reason": error.to_string(),
                    })),
                )
            }
            AppError::Io(error) => {
                error!(target: "app::command", error = %error, "io error in command");
                CommandError::new("IO_ERROR", format!("failed to read input: {error}"), None)
            }
            AppError::Other(message) => {
                error!(target: "app::command", %message, "unexpected error in command");
                CommandError::new("UNKNOWN", message, None)
            }
        }
    }
}

/// Reads a snapshot file: a JSON array of items as exported by the task store.
pub fn load_snapshot(path: &Path) -> AppResult<Vec<ScheduledItem>> {
    let raw = fs::read_to_string(path)?;
    let items: Vec<ScheduledItem> = serde_json::from_str(&raw)?;
    debug!(target: "app::command", path = %path.display(), items = items.len(), "snapshot loaded");
    Ok(items)
}

/// Reads a settings override. Missing sections and fields keep their defaults;
/// no path means all defaults.
pub fn load_settings(path: Option<&Path>) -> AppResult<AdvisorSettings> {
    let Some(path) = path else {
        return Ok(AdvisorSettings::default());
    };
    let raw = fs::read_to_string(path)?;
    let settings: AdvisorSettings = serde_json::from_str(&raw)?;
    debug!(target: "app::command", path = %path.display(), "settings loaded");
    Ok(settings)
}
