use std::path::{Path, PathBuf};

use anyhow::Result;
use tfi_domain::{CondaLocator, InstallError, OsFamily};
use tracing::debug;

use crate::CommandContext;

const UNIX_HOME_DISTRIBUTIONS: [&str; 4] = ["anaconda3", "anaconda", "miniconda3", "miniconda"];
const UNIX_SYSTEM_PREFIXES: [&str; 2] = ["/opt/anaconda3", "/opt/miniconda3"];
const WINDOWS_HOME_DISTRIBUTIONS: [&str; 2] = ["Anaconda3", "Miniconda3"];
const WINDOWS_SYSTEM_PREFIXES: [&str; 2] = [
    r"C:\ProgramData\Anaconda3",
    r"C:\ProgramData\Miniconda3",
];

/// Resolves the conda binary.
///
/// An explicit locator (from `--conda` or `TFI_CONDA`) must point at an
/// existing file. `auto` searches `PATH` and the usual distribution prefixes.
///
/// # Errors
/// Returns `MissingTool` when an explicit path does not exist.
pub(crate) fn locate_conda(ctx: &CommandContext, locator: &CondaLocator) -> Result<Option<PathBuf>> {
    let effective = match locator {
        CondaLocator::Auto => ctx
            .config()
            .default_conda()
            .map_or(CondaLocator::Auto, CondaLocator::parse),
        explicit @ CondaLocator::Path(_) => explicit.clone(),
    };
    match effective {
        CondaLocator::Path(raw) => {
            let path = PathBuf::from(&raw);
            if ctx.fs().is_file(&path) {
                Ok(Some(path))
            } else {
                Err(InstallError::missing_tool(
                    format!("conda at {raw}"),
                    "pass `--conda auto` to search for conda, or point at an existing conda binary",
                )
                .into())
            }
        }
        CondaLocator::Auto => Ok(search(ctx)),
    }
}

fn search(ctx: &CommandContext) -> Option<PathBuf> {
    if let Some(path) = ctx.fs().which("conda") {
        return Some(path);
    }
    let found = candidates(ctx)
        .into_iter()
        .find(|candidate| ctx.fs().is_file(candidate));
    if let Some(path) = &found {
        debug!(conda = %path.display(), "found conda outside PATH");
    }
    found
}

fn candidates(ctx: &CommandContext) -> Vec<PathBuf> {
    let home = ctx.config().paths().home.as_deref();
    match ctx.platform().os {
        OsFamily::Windows => prefixes(home, &WINDOWS_HOME_DISTRIBUTIONS, &WINDOWS_SYSTEM_PREFIXES)
            .into_iter()
            .map(|prefix| prefix.join("Scripts").join("conda.exe"))
            .collect(),
        _ => prefixes(home, &UNIX_HOME_DISTRIBUTIONS, &UNIX_SYSTEM_PREFIXES)
            .into_iter()
            .map(|prefix| prefix.join("bin").join("conda"))
            .collect(),
    }
}

fn prefixes(home: Option<&Path>, in_home: &[&str], system: &[&str]) -> Vec<PathBuf> {
    let mut out: Vec<PathBuf> = home
        .map(|home| in_home.iter().map(|name| home.join(name)).collect())
        .unwrap_or_default();
    out.extend(system.iter().map(PathBuf::from));
    out
}
