use std::path::Path;

use anyhow::{Context, Result};
use tfi_domain::InstallError;
use tracing::{debug, info};

use crate::CommandContext;

/// Runs one installer step with its output forwarded to the terminal, or
/// captured silently under `--quiet`.
///
/// # Errors
/// Returns `Subprocess` on a non-zero exit; spawn failures carry the step name.
pub(crate) fn run_step(
    ctx: &CommandContext,
    step: &str,
    program: &Path,
    args: &[String],
    env: &[(String, String)],
) -> Result<()> {
    info!(step, program = %program.display(), "running");
    debug!(args = %args.join(" "), "step arguments");
    let runner = ctx.runner();
    let output = if ctx.global.quiet {
        runner.run(program, args, env)
    } else {
        runner.run_streaming(program, args, env)
    }
    .with_context(|| format!("{step}: unable to start {}", program.display()))?;
    if !output.success() {
        return Err(InstallError::subprocess(step, output.code).into());
    }
    Ok(())
}

pub(crate) fn strings<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}

pub(crate) fn pip_install_args(packages: &[String]) -> Vec<String> {
    let mut args = strings(["install", "--upgrade", "--ignore-installed"]);
    args.extend(packages.iter().cloned());
    args
}
