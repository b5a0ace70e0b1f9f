use std::env;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use tfi_domain::{package_list, InstallRequest, Interpreter};
use tracing::info;

use super::steps::{pip_install_args, run_step, strings};
use super::{primary_source, InstallReport};
use crate::CommandContext;

/// Recreates `<root>/<env>` with virtualenv and pip-installs into it.
pub(crate) fn install(
    ctx: &CommandContext,
    request: &InstallRequest,
    python: &Interpreter,
    virtualenv: &Path,
    include_native: bool,
) -> Result<InstallReport> {
    let settings = ctx.settings();
    let root = ctx.config().paths().virtualenv_root()?;
    ctx.fs().create_dir_all(&root)?;
    let env_dir = root.join(&settings.env_name);
    if ctx.fs().exists(&env_dir) {
        info!(path = %env_dir.display(), "removing existing virtualenv");
        ctx.fs().remove_dir_all(&env_dir)?;
    }

    let mut args = strings(["--system-site-packages", "--python"]);
    args.push(python.path.display().to_string());
    args.push(env_dir.display().to_string());
    run_step(ctx, "virtualenv", virtualenv, &args, &[])?;

    let bin = env_dir.join("bin");
    let pip = bin.join(python.pip_variant());
    let activation = vec![
        ("VIRTUAL_ENV".to_string(), env_dir.display().to_string()),
        (
            "PATH".to_string(),
            activated_path(&bin, ctx.config().paths().search_path.as_deref())?,
        ),
    ];

    let packages = package_list(primary_source(request), request.gpu, include_native, settings);
    run_step(ctx, "pip install", &pip, &pip_install_args(&packages), &activation)?;

    Ok(InstallReport {
        strategy: "virtualenv",
        environment: env_dir,
        version: request.package_url.is_none().then(|| request.version.clone()),
        packages,
    })
}

/// `PATH` with the environment's `bin` in front, as `activate` would set it.
fn activated_path(bin: &Path, current: Option<&str>) -> Result<String> {
    let mut entries = vec![bin.to_path_buf()];
    if let Some(current) = current {
        entries.extend(env::split_paths(current));
    }
    env::join_paths(entries)
        .context("virtualenv path cannot be placed on PATH")?
        .into_string()
        .map_err(|raw| anyhow!("PATH is not valid unicode: {}", raw.to_string_lossy()))
}
