use std::fmt;

use serde::Serialize;

use crate::InstallError;

/// A version ready to be spliced into wheel names and pins.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// Wraps an explicit token without interpreting it.
    #[must_use]
    pub fn passthrough(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn is_release(&self) -> bool {
        is_release_triplet(&self.0)
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `major.minor.patch`, digits only.
#[must_use]
pub fn is_release_triplet(raw: &str) -> bool {
    let parts: Vec<&str> = raw.split('.').collect();
    parts.len() == 3
        && parts
            .iter()
            .all(|part| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit()))
}

/// `v` followed by a release triplet; release candidates and other tags are skipped.
#[must_use]
pub fn release_from_tag(tag: &str) -> Option<&str> {
    tag.strip_prefix('v').filter(|rest| is_release_triplet(rest))
}

/// Picks the first release tag in index order.
///
/// The index lists newest releases first, so order is trusted rather than sorted.
///
/// # Errors
/// Returns `VersionParse` when no tag looks like `vX.Y.Z`.
pub fn latest_from_tags<I, S>(tags: I) -> Result<ResolvedVersion, InstallError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = 0usize;
    for tag in tags {
        seen += 1;
        if let Some(release) = release_from_tag(tag.as_ref()) {
            return Ok(ResolvedVersion(release.to_string()));
        }
    }
    Err(InstallError::VersionParse {
        input: crate::LATEST.to_string(),
        reason: format!("no release tag of the form vX.Y.Z among {seen} tags"),
    })
}
