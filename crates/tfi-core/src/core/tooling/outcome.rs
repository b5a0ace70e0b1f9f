use serde::Serialize;
use serde_json::{json, Map, Value};
use tfi_domain::InstallError;

use crate::context::CommandInfo;

#[derive(Debug, Clone, Serialize)]
pub struct ExecutionOutcome {
    pub status: CommandStatus,
    pub message: String,
    pub details: Value,
}

impl ExecutionOutcome {
    pub fn success(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Ok,
            message: message.into(),
            details,
        }
    }

    pub fn failure(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::Failure,
            message: message.into(),
            details,
        }
    }

    pub fn user_error(message: impl Into<String>, details: Value) -> Self {
        Self {
            status: CommandStatus::UserError,
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self.status {
            CommandStatus::Ok => 0,
            CommandStatus::UserError => 1,
            CommandStatus::Failure => 2,
        }
    }
}

#[derive(thiserror::Error, Debug)]
#[error("{message}")]
pub struct InstallUserError {
    pub(crate) message: String,
    pub(crate) details: Value,
}

impl InstallUserError {
    pub fn new(message: impl Into<String>, details: Value) -> Self {
        Self {
            message: message.into(),
            details,
        }
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn details(&self) -> &Value {
        &self.details
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub enum CommandStatus {
    Ok,
    UserError,
    Failure,
}

/// Renders an `InstallError` with its reason code and remediation.
#[must_use]
pub fn install_error_outcome(err: &InstallError) -> ExecutionOutcome {
    let mut details = Map::new();
    details.insert("reason".into(), json!(err.reason()));
    if let Some(hint) = err.hint() {
        details.insert("hint".into(), json!(hint));
    }
    match err {
        InstallError::MissingTool { tool, .. } => {
            details.insert("tool".into(), json!(tool));
        }
        InstallError::InvalidMethod { method, os, .. } => {
            details.insert("method".into(), json!(method));
            details.insert("os".into(), json!(os));
        }
        InstallError::VersionParse { input, .. } => {
            details.insert("input".into(), json!(input));
        }
        InstallError::Subprocess { step, code } => {
            details.insert("step".into(), json!(step));
            details.insert("code".into(), json!(code));
        }
        InstallError::UnsupportedPlatform { .. } => {}
    }
    if err.is_user_error() {
        ExecutionOutcome::user_error(err.to_string(), Value::Object(details))
    } else {
        ExecutionOutcome::failure(err.to_string(), Value::Object(details))
    }
}

/// Maps known error types to outcomes and hands anything else back.
///
/// # Errors
/// Returns the original error when it is neither an `InstallError` nor an
/// `InstallUserError`.
pub fn outcome_from_error(err: anyhow::Error) -> anyhow::Result<ExecutionOutcome> {
    let err = match err.downcast::<InstallError>() {
        Ok(install) => return Ok(install_error_outcome(&install)),
        Err(err) => err,
    };
    match err.downcast::<InstallUserError>() {
        Ok(user) => Ok(ExecutionOutcome::user_error(user.message, user.details)),
        Err(err) => Err(err),
    }
}

/// Like `outcome_from_error`, but anything unrecognised becomes a failure
/// with reason `unexpected` instead of escaping to the caller.
#[must_use]
pub fn error_outcome(err: anyhow::Error) -> ExecutionOutcome {
    outcome_from_error(err).unwrap_or_else(|err| {
        tracing::debug!(error = ?err, "unexpected error");
        ExecutionOutcome::failure(
            format!("{err:#}"),
            json!({
                "reason": "unexpected",
                "hint": "re-run with --trace for the full error chain",
            }),
        )
    })
}

#[must_use]
pub fn to_json_response(info: CommandInfo, outcome: &ExecutionOutcome) -> Value {
    let status = match outcome.status {
        CommandStatus::Ok => "ok",
        CommandStatus::UserError => "user-error",
        CommandStatus::Failure => "error",
    };
    let details = match &outcome.details {
        Value::Object(_) => outcome.details.clone(),
        Value::Null => json!({}),
        other => json!({ "value": other }),
    };
    json!({
        "status": status,
        "message": format_status_message(info, &outcome.message),
        "details": details,
    })
}

#[must_use]
pub fn format_status_message(info: CommandInfo, message: &str) -> String {
    let prefix = format!("tfi {}", info.name);
    if message.is_empty() {
        prefix
    } else if message.starts_with(&prefix) {
        message.to_string()
    } else {
        format!("{prefix}: {message}")
    }
}
