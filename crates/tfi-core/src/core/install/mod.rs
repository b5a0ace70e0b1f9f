//! `tfi install`: validate, probe, select one strategy and run its installer.

mod conda;
mod steps;
mod system;
mod virtualenv;

use std::path::PathBuf;

use anyhow::Result;
use serde::Serialize;
use tfi_domain::{select_strategy, validate_method, InstallRequest, PrimarySource, Strategy};
use tracing::info;

use crate::outcome::outcome_from_error;
use crate::probe::probe_tools;
use crate::{CommandContext, ExecutionOutcome};

#[derive(Debug, Serialize)]
pub(crate) struct InstallReport {
    pub(crate) strategy: &'static str,
    pub(crate) environment: PathBuf,
    /// Resolved or requested version; absent when a package URL was given.
    pub(crate) version: Option<String>,
    pub(crate) packages: Vec<String>,
}

/// Installs TensorFlow and its companions using the strategy the request and
/// host allow.
///
/// # Errors
/// Returns an error only for unexpected failures; installation errors become
/// user-error or failure outcomes.
pub fn install(ctx: &CommandContext, request: &InstallRequest) -> Result<ExecutionOutcome> {
    match run_install(ctx, request) {
        Ok(report) => {
            let message = format!(
                "installed {} into {} ({})",
                report.packages.first().map_or("tensorflow", String::as_str),
                report.environment.display(),
                report.strategy
            );
            Ok(ExecutionOutcome::success(message, serde_json::to_value(&report)?))
        }
        Err(err) => outcome_from_error(err),
    }
}

fn run_install(ctx: &CommandContext, request: &InstallRequest) -> Result<InstallReport> {
    validate_method(request.method, ctx.platform())?;
    let tools = probe_tools(ctx, request.method, &request.conda)?;
    let strategy = select_strategy(request.method, ctx.platform(), &tools, ctx.settings())?;
    info!(strategy = strategy.label(), method = %request.method, "selected strategy");
    let include_native = strategy.allows_native_builds();
    match &strategy {
        Strategy::ManagedEnv { conda } => conda::install(ctx, request, conda, include_native),
        Strategy::VirtualEnv {
            python, virtualenv, ..
        } => virtualenv::install(ctx, request, python, virtualenv, include_native),
        Strategy::System { python } => system::install(ctx, request, python, include_native),
    }
}

pub(crate) fn primary_source(request: &InstallRequest) -> PrimarySource<'_> {
    match &request.package_url {
        Some(url) => PrimarySource::Override(url),
        None => PrimarySource::Version(&request.version),
    }
}
