use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::json;
use tfi_domain::{is_latest, latest_from_tags, ResolvedVersion};
use tracing::{debug, warn};

use crate::core::net::build_http_client;
use crate::effects::ReleaseIndex;
use crate::{CommandContext, InstallUserError};

#[derive(Debug, Deserialize)]
struct ReleaseRecord {
    tag_name: String,
}

/// GitHub releases API client.
pub(crate) struct GithubReleaseIndex;

impl ReleaseIndex for GithubReleaseIndex {
    fn release_tags(&self, url: &str) -> Result<Vec<String>> {
        let client = build_http_client()?;
        let response = client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .send()
            .with_context(|| format!("failed to query release index at {url}"))?
            .error_for_status()
            .with_context(|| format!("release index at {url} returned an error"))?;
        let records: Vec<ReleaseRecord> = response
            .json()
            .with_context(|| format!("invalid release listing from {url}"))?;
        Ok(records.into_iter().map(|record| record.tag_name).collect())
    }
}

/// Turns a version token into a concrete version.
///
/// Explicit tokens never touch the network; anything other than `"latest"` is
/// passed through and left for pip to accept or reject.
///
/// # Errors
/// Returns an error when offline, when the index cannot be queried, or when no
/// release tag matches `vX.Y.Z`.
pub fn resolve_version(ctx: &CommandContext, token: &str) -> Result<ResolvedVersion> {
    if !is_latest(token) {
        let version = ResolvedVersion::passthrough(token);
        if !version.is_release() {
            warn!(version = %version, "version is not of the form major.minor.patch; passing it through");
        }
        return Ok(version);
    }
    if !ctx.is_online() {
        return Err(InstallUserError::new(
            "TFI_ONLINE=1 required to resolve the latest TensorFlow release",
            json!({
                "reason": "offline",
                "hint": "pass an explicit release such as `--version 1.1.0` or unset TFI_ONLINE",
            }),
        )
        .into());
    }
    let url = &ctx.settings().releases_url;
    debug!(%url, "listing releases");
    let tags = ctx.effects().releases().release_tags(url)?;
    let resolved = latest_from_tags(&tags)?;
    debug!(version = %resolved, tags = tags.len(), "resolved latest release");
    Ok(resolved)
}
