use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tfi_domain::{companion_packages, wheel_url, InstallError, InstallRequest, OsFamily};
use tracing::{debug, info};

use super::steps::{pip_install_args, run_step, strings};
use super::InstallReport;
use crate::probe::query_interpreter;
use crate::releases::resolve_version;
use crate::CommandContext;

#[derive(Debug, Deserialize)]
struct EnvListing {
    #[serde(default)]
    envs: Vec<PathBuf>,
}

/// Installs into a named conda environment, creating it when missing.
pub(crate) fn install(
    ctx: &CommandContext,
    request: &InstallRequest,
    conda: &Path,
    include_native: bool,
) -> Result<InstallReport> {
    let settings = ctx.settings();
    let env_name = settings.env_name.as_str();
    let prefix = match find_env(ctx, conda, env_name)? {
        Some(prefix) => {
            info!(env = env_name, prefix = %prefix.display(), "reusing conda environment");
            prefix
        }
        None => {
            let args = strings([
                "create".to_string(),
                "--yes".to_string(),
                "--name".to_string(),
                env_name.to_string(),
                format!("python={}", settings.conda_python),
            ]);
            run_step(ctx, "conda create", conda, &args, &[])?;
            find_env(ctx, conda, env_name)?.ok_or_else(|| {
                anyhow!("conda environment `{env_name}` not listed after creation")
            })?
        }
    };

    let python = env_python(&prefix, &ctx.platform().os);
    let (primary, version) = match &request.package_url {
        Some(url) => (url.clone(), None),
        None => {
            let version = resolve_version(ctx, &request.version)?;
            let details = query_interpreter(ctx, &python)?;
            let url = wheel_url(
                &settings.wheel_url_template,
                &version,
                request.gpu,
                &ctx.platform().os,
                details.version,
            )
            .ok_or_else(|| InstallError::UnsupportedPlatform {
                reason: format!("no wheel naming for {}", ctx.platform().os),
                hint: None,
            })?;
            (url, Some(version.to_string()))
        }
    };
    debug!(%primary, "primary package");

    let mut pip_args = strings(["-m", "pip"]);
    pip_args.extend(pip_install_args(std::slice::from_ref(&primary)));
    run_step(ctx, "pip install", &python, &pip_args, &[])?;

    let companions = companion_packages(settings, include_native);
    let mut conda_args = strings(["install", "--yes", "--name", env_name]);
    conda_args.extend(companions.iter().cloned());
    run_step(ctx, "conda install", conda, &conda_args, &[])?;

    let mut packages = vec![primary];
    packages.extend(companions);
    Ok(InstallReport {
        strategy: "conda",
        environment: prefix,
        version,
        packages,
    })
}

fn find_env(ctx: &CommandContext, conda: &Path, name: &str) -> Result<Option<PathBuf>> {
    let args = strings(["env", "list", "--json"]);
    let output = ctx.runner().run(conda, &args, &[])?;
    if !output.success() {
        return Err(InstallError::subprocess("conda env list", output.code).into());
    }
    let listing: EnvListing = serde_json::from_str(&output.stdout)
        .with_context(|| format!("invalid `conda env list --json` output from {}", conda.display()))?;
    Ok(listing
        .envs
        .into_iter()
        .find(|prefix| prefix.file_name().is_some_and(|file| file == name)))
}

fn env_python(prefix: &Path, os: &OsFamily) -> PathBuf {
    match os {
        OsFamily::Windows => prefix.join("python.exe"),
        _ => prefix.join("bin").join("python"),
    }
}
