use thiserror::Error;

/// Failures that end an installation run.
///
/// Every variant is fatal; the caller renders `hint()` as the remediation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstallError {
    #[error("{reason}")]
    UnsupportedPlatform { reason: String, hint: Option<String> },
    #[error("installation method `{method}` is not supported on {os}")]
    InvalidMethod {
        method: String,
        os: String,
        hint: String,
    },
    #[error("{tool} not found")]
    MissingTool { tool: String, hint: String },
    #[error("unable to parse version `{input}`: {reason}")]
    VersionParse { input: String, reason: String },
    #[error("{step} failed with exit code {code}")]
    Subprocess { step: String, code: i32 },
}

impl InstallError {
    /// Stable machine-readable code used in JSON details.
    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::UnsupportedPlatform { .. } => "unsupported_platform",
            Self::InvalidMethod { .. } => "invalid_method",
            Self::MissingTool { .. } => "missing_tool",
            Self::VersionParse { .. } => "version_parse",
            Self::Subprocess { .. } => "subprocess_failed",
        }
    }

    #[must_use]
    pub fn hint(&self) -> Option<&str> {
        match self {
            Self::UnsupportedPlatform { hint, .. } => hint.as_deref(),
            Self::InvalidMethod { hint, .. } | Self::MissingTool { hint, .. } => Some(hint),
            Self::VersionParse { .. } => {
                Some("pass an explicit release such as `--version 1.1.0`")
            }
            Self::Subprocess { .. } => {
                Some("inspect the command output above; the environment was left in place for a retry")
            }
        }
    }

    /// Subprocess failures are operational; everything else is a usage problem.
    #[must_use]
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Subprocess { .. })
    }

    pub fn subprocess(step: impl Into<String>, code: i32) -> Self {
        Self::Subprocess {
            step: step.into(),
            code,
        }
    }

    pub fn missing_tool(tool: impl Into<String>, hint: impl Into<String>) -> Self {
        Self::MissingTool {
            tool: tool.into(),
            hint: hint.into(),
        }
    }
}
