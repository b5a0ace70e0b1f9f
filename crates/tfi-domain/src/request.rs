use std::fmt;

pub const LATEST: &str = "latest";
pub const AUTO_LOCATOR: &str = "auto";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InstallMethod {
    #[default]
    Auto,
    /// Named conda environment.
    ManagedEnv,
    /// virtualenv under the virtualenv root.
    VirtualEnv,
    /// pip against the system interpreter (Windows only).
    System,
}

impl InstallMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::ManagedEnv => "conda",
            Self::VirtualEnv => "virtualenv",
            Self::System => "system",
        }
    }
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where to look for conda: search the usual places, or use an explicit path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CondaLocator {
    #[default]
    Auto,
    Path(String),
}

impl CondaLocator {
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(AUTO_LOCATOR) {
            Self::Auto
        } else {
            Self::Path(trimmed.to_string())
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallRequest {
    pub method: InstallMethod,
    pub version: String,
    pub gpu: bool,
    /// Replaces the derived primary locator; companions still install.
    pub package_url: Option<String>,
    pub conda: CondaLocator,
}

impl Default for InstallRequest {
    fn default() -> Self {
        Self {
            method: InstallMethod::Auto,
            version: LATEST.to_string(),
            gpu: false,
            package_url: None,
            conda: CondaLocator::Auto,
        }
    }
}

impl InstallRequest {
    #[must_use]
    pub fn wants_latest(&self) -> bool {
        is_latest(&self.version)
    }
}

#[must_use]
pub fn is_latest(token: &str) -> bool {
    token.trim() == LATEST
}
