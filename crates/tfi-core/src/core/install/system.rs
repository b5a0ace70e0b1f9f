use anyhow::Result;
use tfi_domain::{package_list, InstallRequest, Interpreter};

use super::steps::{pip_install_args, run_step, strings};
use super::{primary_source, InstallReport};
use crate::CommandContext;

/// Installs into the Windows interpreter's own site-packages.
pub(crate) fn install(
    ctx: &CommandContext,
    request: &InstallRequest,
    python: &Interpreter,
    include_native: bool,
) -> Result<InstallReport> {
    let upgrade = strings(["-m", "pip", "install", "--upgrade", "pip"]);
    run_step(ctx, "pip upgrade", &python.path, &upgrade, &[])?;

    let packages = package_list(
        primary_source(request),
        request.gpu,
        include_native,
        ctx.settings(),
    );
    let mut args = strings(["-m", "pip"]);
    args.extend(pip_install_args(&packages));
    run_step(ctx, "pip install", &python.path, &args, &[])?;

    Ok(InstallReport {
        strategy: "system",
        environment: python.path.clone(),
        version: request.package_url.is_none().then(|| request.version.clone()),
        packages,
    })
}
