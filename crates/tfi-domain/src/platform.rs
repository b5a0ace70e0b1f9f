use std::fmt;
use std::str::FromStr;

use pep440_rs::Version;
use serde::Serialize;

use crate::InstallError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    #[serde(rename = "macos")]
    MacOs,
    Linux,
    /// Anything the installer has no strategy for, tagged with the target name.
    Other(String),
}

impl OsFamily {
    #[must_use]
    pub fn from_target(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "macos" => Self::MacOs,
            "linux" => Self::Linux,
            other => Self::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Windows => f.write_str("Windows"),
            Self::MacOs => f.write_str("macOS"),
            Self::Linux => f.write_str("Linux"),
            Self::Other(name) => f.write_str(name),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlatformInfo {
    pub os: OsFamily,
    pub pointer_width: u32,
}

impl PlatformInfo {
    #[must_use]
    pub fn new(os: OsFamily, pointer_width: u32) -> Self {
        Self { os, pointer_width }
    }

    /// Rejects hosts the installer cannot target.
    ///
    /// # Errors
    /// Returns `UnsupportedPlatform` for unknown operating systems or
    /// anything other than a 64-bit pointer width.
    pub fn validate(&self) -> Result<(), InstallError> {
        if let OsFamily::Other(name) = &self.os {
            return Err(InstallError::UnsupportedPlatform {
                reason: format!("unsupported platform `{name}`"),
                hint: Some("TensorFlow can be installed on Windows, macOS and Linux".to_string()),
            });
        }
        if self.pointer_width != 64 {
            return Err(InstallError::UnsupportedPlatform {
                reason: format!(
                    "a 64-bit host is required ({}-bit detected)",
                    self.pointer_width
                ),
                hint: Some("run tfi from a 64-bit build on a 64-bit operating system".to_string()),
            });
        }
        Ok(())
    }
}

/// Interpreter language version, `major.minor` only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PythonVersion {
    pub major: u64,
    pub minor: u64,
}

impl PythonVersion {
    #[must_use]
    pub const fn new(major: u64, minor: u64) -> Self {
        Self { major, minor }
    }

    /// Digits used in CPython wheel tags, e.g. `35` for 3.5.
    #[must_use]
    pub fn tag_digits(&self) -> String {
        format!("{}{}", self.major, self.minor)
    }
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for PythonVersion {
    type Err = InstallError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let parse_error = |reason: String| InstallError::VersionParse {
            input: trimmed.to_string(),
            reason,
        };
        let version = Version::from_str(trimmed).map_err(|err| parse_error(err.to_string()))?;
        match version.release() {
            [major, minor, ..] => Ok(Self::new(*major, *minor)),
            _ => Err(parse_error("expected at least major.minor".to_string())),
        }
    }
}
